//! Scheduler tests: forum isolation, dry runs and the repeat loop

use crate::common::{forum, mount_listing, mount_thread, published_channel, test_config};
use forum_feed::publish::MemoryPublisher;
use forum_feed::{ForumFeedError, Scheduler};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_two_forums_publish_independently() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, 1, &["thread-11.htm"]).await;
    mount_listing(&server, 3, 1, &["thread-31.htm", "thread-32.htm"]).await;
    mount_thread(&server, "thread-11.htm", "HD one").await;
    mount_thread(&server, "thread-31.htm", "4K one").await;
    mount_thread(&server, "thread-32.htm", "4K two").await;

    let config = test_config(
        &server.uri(),
        vec![forum(1, "feeds/4k2/hd.xml"), forum(3, "feeds/4k2/4k.xml")],
        1,
    );
    let publisher = MemoryPublisher::new();
    let scheduler = Scheduler::new(&config, Arc::new(publisher.clone())).unwrap();

    let report = scheduler.run_cycle().await;
    assert!(report.is_success());
    assert_eq!(report.published.len(), 2);

    assert_eq!(
        publisher.paths(),
        vec!["feeds/4k2/4k.xml".to_string(), "feeds/4k2/hd.xml".to_string()]
    );
    assert_eq!(published_channel(&publisher, "feeds/4k2/hd.xml").items().len(), 1);
    assert_eq!(published_channel(&publisher, "feeds/4k2/4k.xml").items().len(), 2);
}

#[tokio::test]
async fn test_failed_forum_does_not_block_other_forum() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forum-1-1.htm"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;
    mount_listing(&server, 3, 1, &["thread-31.htm"]).await;
    mount_thread(&server, "thread-31.htm", "4K one").await;

    let config = test_config(
        &server.uri(),
        vec![forum(1, "feeds/4k2/hd.xml"), forum(3, "feeds/4k2/4k.xml")],
        1,
    );
    let publisher = MemoryPublisher::new();
    let scheduler = Scheduler::new(&config, Arc::new(publisher.clone())).unwrap();

    let report = scheduler.run_cycle().await;

    assert_eq!(report.published.len(), 1);
    assert_eq!(report.published[0].output_path, "feeds/4k2/4k.xml");
    assert_eq!(report.published[0].items, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0.category_id, 1);
    assert!(matches!(report.failed[0].1, ForumFeedError::Crawl { .. }));

    assert!(publisher.get("feeds/4k2/hd.xml").is_none());
    assert!(publisher.get("feeds/4k2/4k.xml").is_some());
}

#[tokio::test]
async fn test_single_run_reports_forum_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 1);
    let scheduler = Scheduler::new(&config, Arc::new(MemoryPublisher::new())).unwrap();

    let result = scheduler.run_until(std::future::pending::<()>()).await;
    match result {
        Err(ForumFeedError::Crawl { forum, .. }) => assert_eq!(forum, "Forum 1"),
        other => panic!("expected forum failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dry_run_issues_no_requests() {
    let server = MockServer::start().await;

    let mut config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 3);
    config.crawler.dry_run = true;
    let publisher = MemoryPublisher::new();
    let scheduler = Scheduler::new(&config, Arc::new(publisher.clone())).unwrap();

    let cycles = scheduler.run_until(std::future::pending::<()>()).await.unwrap();

    assert_eq!(cycles, 1);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(publisher.paths().is_empty());
}

#[tokio::test]
async fn test_dry_run_repeats_without_requests() {
    let server = MockServer::start().await;

    let mut config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 2);
    config.crawler.dry_run = true;
    let publisher = MemoryPublisher::new();
    let scheduler = Scheduler::new(&config, Arc::new(publisher.clone()))
        .unwrap()
        .with_interval(Duration::from_millis(30));

    let report = scheduler.run_cycle().await;
    assert!(report.dry_run);
    assert!(report.is_success());
    assert!(report.published.is_empty());

    let cycles = scheduler
        .run_until(tokio::time::sleep(Duration::from_millis(200)))
        .await
        .unwrap();

    assert!(cycles >= 2, "expected repeated dry cycles, got {}", cycles);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(publisher.paths().is_empty());
}

#[tokio::test]
async fn test_repeat_loop_runs_until_shutdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forum-1-1.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(crate::common::listing_html(&[
            "thread-1.htm",
        ])))
        .mount(&server)
        .await;
    mount_thread(&server, "thread-1.htm", "Repeated").await;

    let config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 1);
    let publisher = MemoryPublisher::new();
    let scheduler = Scheduler::new(&config, Arc::new(publisher.clone()))
        .unwrap()
        .with_interval(Duration::from_millis(50));

    let cycles = scheduler
        .run_until(tokio::time::sleep(Duration::from_millis(600)))
        .await
        .unwrap();

    assert!(cycles >= 2, "expected repeated cycles, got {}", cycles);
    let listing_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/forum-1-1.htm")
        .count();
    assert!(listing_requests as u64 >= cycles);
    assert_eq!(published_channel(&publisher, "feeds/hd.xml").items().len(), 1);
}

#[tokio::test]
async fn test_repeat_loop_survives_failed_cycle() {
    let server = MockServer::start().await;
    // First cycle: the listing fails all four attempts
    Mock::given(method("GET"))
        .and(path("/forum-1-1.htm"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forum-1-1.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(crate::common::listing_html(&[
            "thread-1.htm",
        ])))
        .mount(&server)
        .await;
    mount_thread(&server, "thread-1.htm", "Second time lucky").await;

    let config = test_config(&server.uri(), vec![forum(1, "feeds/hd.xml")], 1);
    let publisher = MemoryPublisher::new();
    let scheduler = Scheduler::new(&config, Arc::new(publisher.clone()))
        .unwrap()
        .with_interval(Duration::from_millis(50));

    let cycles = scheduler
        .run_until(tokio::time::sleep(Duration::from_millis(600)))
        .await
        .unwrap();

    assert!(cycles >= 2);
    assert!(publisher.get("feeds/hd.xml").is_some());
}
