//! Forum crawl tests: fan-out, filtering, ordering and failure propagation

use crate::common::{
    forum, mount_listing, mount_thread, published_channel, test_config, thread_html,
};
use forum_feed::crawler::{crawl_and_publish, crawl_forum, CrawlContext, FetchError};
use forum_feed::publish::MemoryPublisher;
use forum_feed::ForumFeedError;
use std::sync::Arc;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_single_page_drops_untitled_thread() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 1, &["thread-a.htm", "thread-b.htm"]).await;
    mount_thread(&server, "thread-a.htm", "Movie X").await;
    mount_thread(&server, "thread-b.htm", "").await;

    let config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 1);
    let ctx = Arc::new(CrawlContext::from_config(&config).unwrap());
    let publisher = MemoryPublisher::new();

    let items = crawl_and_publish(ctx, &config.forums[0], 1, &publisher)
        .await
        .expect("crawl succeeds");
    assert_eq!(items, 1);

    let channel = published_channel(&publisher, "feeds/hd.xml");
    assert_eq!(channel.title(), "Forum 1");
    assert_eq!(
        channel.link(),
        format!("{}/forum-1-1.htm?orderby=tid", server.uri())
    );
    assert_eq!(channel.items().len(), 1);

    let item = &channel.items()[0];
    assert_eq!(item.title(), Some("Movie X"));
    assert_eq!(
        item.link(),
        Some(format!("{}/thread-a.htm", server.uri()).as_str())
    );
    let enclosure = item.enclosure().expect("enclosure");
    assert_eq!(
        enclosure.url(),
        format!("{}/attach-download-1.htm", server.uri())
    );
    assert_eq!(enclosure.length(), "0");
    assert_eq!(enclosure.mime_type(), "application/x-bittorrent");
}

#[tokio::test]
async fn test_one_listing_request_per_page() {
    let server = MockServer::start().await;
    // Each listing mock expects exactly one request
    for page in 1..=4 {
        mount_listing(&server, 7, page, &[]).await;
    }

    let config = test_config(&server.uri(), vec![forum(7, "feeds/seven.xml")], 4);
    let ctx = Arc::new(CrawlContext::from_config(&config).unwrap());

    let feed = crawl_forum(ctx, &config.forums[0], 4).await.unwrap();
    assert!(feed.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_items_sorted_by_descending_link() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 1, &["thread-120.htm", "thread-9.htm", "thread-130.htm"]).await;
    mount_listing(&server, 1, 2, &["thread-100.htm", "thread-15.htm"]).await;
    for href in [
        "thread-120.htm",
        "thread-9.htm",
        "thread-130.htm",
        "thread-100.htm",
        "thread-15.htm",
    ] {
        mount_thread(&server, href, &format!("Title {}", href)).await;
    }

    let config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 2);
    let ctx = Arc::new(CrawlContext::from_config(&config).unwrap());

    let feed = crawl_forum(ctx, &config.forums[0], 2).await.unwrap();
    assert_eq!(feed.len(), 5);
    assert!(feed
        .items
        .windows(2)
        .all(|pair| pair[0].link >= pair[1].link));

    let last_segments: Vec<&str> = feed
        .items
        .iter()
        .map(|item| item.link.rsplit('/').next().unwrap())
        .collect();
    assert_eq!(
        last_segments,
        vec![
            "thread-9.htm",
            "thread-15.htm",
            "thread-130.htm",
            "thread-120.htm",
            "thread-100.htm",
        ]
    );
}

#[tokio::test]
async fn test_thread_retry_recovers() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 1, &["thread-1.htm"]).await;
    Mock::given(method("GET"))
        .and(path("/thread-1.htm"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_thread(&server, "thread-1.htm", "Eventually").await;

    let config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 1);
    let ctx = Arc::new(CrawlContext::from_config(&config).unwrap());

    let feed = crawl_forum(ctx, &config.forums[0], 1).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed.items[0].title, "Eventually");
}

#[tokio::test]
async fn test_exhausted_thread_fails_forum_without_publishing() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 1, &["thread-ok.htm", "thread-broken.htm"]).await;
    mount_thread(&server, "thread-ok.htm", "Fine").await;
    Mock::given(method("GET"))
        .and(path("/thread-broken.htm"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 1);
    let ctx = Arc::new(CrawlContext::from_config(&config).unwrap());
    let publisher = MemoryPublisher::new();

    let result = crawl_and_publish(ctx, &config.forums[0], 1, &publisher).await;

    assert!(matches!(
        result,
        Err(ForumFeedError::Fetch(FetchError::Exhausted { attempts: 4, .. }))
    ));
    assert!(publisher.get("feeds/hd.xml").is_none());
}

#[tokio::test]
async fn test_failed_listing_page_fails_forum() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 1, &["thread-1.htm"]).await;
    mount_thread(&server, "thread-1.htm", "Page one thread").await;
    Mock::given(method("GET"))
        .and(path("/forum-1-2.htm"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 2);
    let ctx = Arc::new(CrawlContext::from_config(&config).unwrap());

    let result = crawl_forum(ctx, &config.forums[0], 2).await;
    assert!(matches!(
        result,
        Err(ForumFeedError::Fetch(FetchError::Exhausted { .. }))
    ));
}

#[tokio::test]
async fn test_bounded_fan_out_produces_same_feed() {
    let server = MockServer::start().await;
    let hrefs: Vec<String> = (1..=12).map(|i| format!("thread-{:03}.htm", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_listing(&server, 2, 1, &href_refs[..6]).await;
    mount_listing(&server, 2, 2, &href_refs[6..]).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/thread-\d{3}\.htm$"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(thread_html("Same", "b", "attach-download-9.htm")),
        )
        .expect(12)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), vec![forum(2, "feeds/two.xml")], 2);
    config.crawler.max_concurrent_pages = Some(1);
    config.crawler.max_concurrent_threads = Some(2);
    let ctx = Arc::new(CrawlContext::from_config(&config).unwrap());

    let feed = crawl_forum(ctx, &config.forums[0], 2).await.unwrap();
    assert_eq!(feed.len(), 12);
    assert!(feed.items[0].link.ends_with("thread-012.htm"));
    assert!(feed.items[11].link.ends_with("thread-001.htm"));
}
