//! Concurrent forwards through one proxy instance.

use std::time::{Duration, Instant};

use passthrough_proxy::config::ProxyConfig;

mod common;

#[tokio::test]
async fn test_concurrent_forwards_are_independent() {
    let (upstream, _seen) = common::start_echo_upstream().await;
    let dead = common::unused_addr().await;
    let (proxy, shutdown) = common::start_proxy(ProxyConfig::default()).await;

    let concurrency = 20;
    let requests_per_task = 25;
    let client = common::proxied_client(proxy);
    let start = Instant::now();

    let tasks: Vec<_> = (0..concurrency)
        .map(|task| {
            let client = client.clone();
            tokio::spawn(async move {
                let mut ok = 0;
                let mut failed = 0;
                for i in 0..requests_per_task {
                    // Every fifth request targets a dead upstream.
                    let (target, expect_ok) = if i % 5 == 4 { (dead, false) } else { (upstream, true) };
                    let body = format!("task {} request {}\r\n", task, i);

                    let res = client
                        .post(format!("http://{}/echo", target))
                        .body(body.clone())
                        .send()
                        .await
                        .unwrap();

                    if expect_ok {
                        assert_eq!(res.status(), 200);
                        assert_eq!(res.text().await.unwrap(), body);
                        ok += 1;
                    } else {
                        assert_eq!(res.status(), 502);
                        failed += 1;
                    }
                }
                (ok, failed)
            })
        })
        .collect();

    let mut total_ok = 0;
    let mut total_failed = 0;
    for task in tasks {
        let (ok, failed) = task.await.unwrap();
        total_ok += ok;
        total_failed += failed;
    }

    let elapsed = start.elapsed();
    println!(
        "{} forwards ({} failed on purpose) in {:?}",
        total_ok + total_failed,
        total_failed,
        elapsed
    );

    assert_eq!(total_ok, concurrency * 20);
    assert_eq!(total_failed, concurrency * 5);
    assert!(elapsed < Duration::from_secs(30));

    shutdown.trigger();
}
