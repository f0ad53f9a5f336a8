use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use pollq::{MessageQueue, QueueManager};

/// Benchmark: enqueue into the backlog with no waiting consumers
fn bench_enqueue_backlog(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue_backlog");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("1000_messages", |b| {
        let payload = serde_json::json!({"test": "data", "id": 123});
        b.iter(|| {
            let queue = MessageQueue::new("bench".to_string());
            for _ in 0..1000 {
                black_box(queue.enqueue(payload.clone()));
            }
        });
    });
    group.finish();
}

/// Benchmark: drain a filled backlog with zero-timeout receives
fn bench_dequeue_backlog(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("dequeue_backlog");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("1000_messages", |b| {
        b.to_async(&rt).iter(|| async {
            let queue = MessageQueue::new("bench".to_string());
            let payload = serde_json::json!({"test": "data"});

            for _ in 0..1000 {
                queue.enqueue(payload.clone());
            }
            for _ in 0..1000 {
                black_box(queue.dequeue(Duration::ZERO).await);
            }
        });
    });
    group.finish();
}

/// Benchmark: hand-off latency to consumers already blocked on the queue
fn bench_handoff(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("handoff");

    for consumers in [1usize, 8, 64].iter() {
        group.throughput(Throughput::Elements(*consumers as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(consumers),
            consumers,
            |b, &consumers| {
                b.to_async(&rt).iter(|| async move {
                    let queue = Arc::new(MessageQueue::new("bench".to_string()));
                    let mut handles = Vec::with_capacity(consumers);
                    for _ in 0..consumers {
                        let queue = queue.clone();
                        handles.push(tokio::spawn(async move {
                            queue.dequeue(Duration::from_secs(5)).await
                        }));
                    }
                    while queue.waiting() < consumers {
                        tokio::task::yield_now().await;
                    }
                    for i in 0..consumers {
                        queue.enqueue(serde_json::json!({"id": i}));
                    }
                    for handle in handles {
                        black_box(handle.await.unwrap());
                    }
                });
            },
        );
    }
    group.finish();
}

/// Benchmark: registry lookups across many queue names
fn bench_manager_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("manager_routing");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("100_queues", |b| {
        let manager = QueueManager::new();
        let names: Vec<String> = (0..100).map(|i| format!("queue-{}", i)).collect();

        b.iter(|| {
            for i in 0..1000 {
                black_box(manager.get_or_create_queue(&names[i % names.len()]));
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_enqueue_backlog,
    bench_dequeue_backlog,
    bench_handoff,
    bench_manager_routing
);
criterion_main!(benches);
