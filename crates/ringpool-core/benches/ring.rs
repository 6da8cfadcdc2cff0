use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ringpool_core::{RingBuffer, WorkItem, RECORD_SIZE};

fn bench_record_push_pop(c: &mut Criterion) {
    let mut ring = RingBuffer::allocate((RECORD_SIZE * 64) as u32).unwrap();
    let record = [7u8; RECORD_SIZE];
    let mut out = [0u8; RECORD_SIZE];

    c.bench_function("ring push+pop one record", |b| {
        b.iter(|| {
            ring.push(black_box(&record));
            ring.pop(black_box(&mut out));
        })
    });
}

fn bench_burst(c: &mut Criterion) {
    let mut ring = RingBuffer::allocate((RECORD_SIZE * 1024) as u32).unwrap();
    let record = [1u8; RECORD_SIZE];
    let mut out = [0u8; RECORD_SIZE];

    c.bench_function("ring fill+drain 1024 records", |b| {
        b.iter(|| {
            while ring.push(&record) as usize == RECORD_SIZE {}
            while ring.pop(&mut out) as usize == RECORD_SIZE {}
        })
    });
}

fn bench_work_item_codec(c: &mut Criterion) {
    c.bench_function("work item encode+decode", |b| {
        b.iter(|| {
            let record = WorkItem::new(Box::new(|| {}), black_box(1)).into_record();
            // Safety: record comes straight from into_record and is decoded once.
            let item = unsafe { WorkItem::from_record(&record) };
            black_box(item.seq());
        })
    });
}

criterion_group!(benches, bench_record_push_pop, bench_burst, bench_work_item_codec);
criterion_main!(benches);
