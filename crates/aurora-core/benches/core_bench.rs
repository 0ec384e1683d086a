use aurora_core::{
    DArray, EventCode, EventContext, EventHandler, EventSystem, ListenerId, SenderId,
    TaggedAllocator,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::rc::Rc;
use std::sync::Arc;

fn bench_darray(c: &mut Criterion) {
    let allocator = Arc::new(TaggedAllocator::new());
    let mut group = c.benchmark_group("DArray");

    group.bench_function("push 10k from capacity 1", |b| {
        b.iter(|| {
            let mut array = DArray::<u32>::new(allocator.clone());
            for i in 0..10_000u32 {
                array.push(black_box(i));
            }
            black_box(array.len());
        });
    });

    group.bench_function("insert_at front 1k", |b| {
        b.iter(|| {
            let mut array = DArray::<u64>::with_capacity(allocator.clone(), 1_024);
            array.push(0);
            for i in 0..1_000u64 {
                let _ = array.insert_at(0, black_box(i));
            }
            black_box(array.len());
        });
    });

    group.finish();
}

fn bench_fire(c: &mut Criterion) {
    const CODE: EventCode = 0x400;

    let events = EventSystem::new(Arc::new(TaggedAllocator::new()));
    let _ = events.initialize();

    // Eight pass-through listeners, the last one claims the event.
    for id in 0..8u64 {
        let handler: Rc<dyn EventHandler> = Rc::new(
            move |_: &EventSystem,
                  _: EventCode,
                  _: Option<SenderId>,
                  listener: ListenerId,
                  context: &EventContext| {
                black_box(context.as_u32()[0]);
                listener.0 == 7
            },
        );
        let _ = events.register(CODE, ListenerId(id), handler);
    }

    let mut group = c.benchmark_group("Event Router");

    group.bench_function("fire through 8 listeners", |b| {
        b.iter(|| {
            black_box(events.fire(CODE, None, EventContext::from_u32([1, 2, 3, 4])));
        });
    });

    group.bench_function("fire without listeners", |b| {
        b.iter(|| {
            black_box(events.fire(CODE + 1, None, EventContext::empty()));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_darray, bench_fire);
criterion_main!(benches);
