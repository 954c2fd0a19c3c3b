use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polylist_core::{PagedRange, Record};
use polylist_foundation::{ClassifierKey, Diagnostics, EntryView, SequenceStore};

#[derive(Debug)]
struct Row(usize);
impl Record for Row {}

#[derive(Debug)]
struct Pages {
    rows: usize,
    position: usize,
    open: bool,
}

impl PagedRange for Pages {
    fn count(&self) -> usize {
        self.rows
    }
    fn seek(&mut self, local_offset: usize) {
        self.position = local_offset;
    }
    fn is_open(&self) -> bool {
        self.open
    }
    fn close(&mut self) {
        self.open = false;
    }
}

fn accept_all(view: &EntryView<'_>, _position: Option<usize>) -> Option<ClassifierKey> {
    Some(match view {
        EntryView::Plain(_) => ClassifierKey::shape_of::<Row>(),
        EntryView::Paged { .. } => ClassifierKey::PagedRange,
    })
}

/// Ten plain records around each of `ranges` ranges of 500 rows.
fn interleaved(ranges: usize) -> SequenceStore {
    let mut store = SequenceStore::new(Diagnostics::silent());
    for i in 0..ranges {
        let records: Vec<Rc<dyn Record>> = (0..10).map(|n| Rc::new(Row(i * 10 + n)) as Rc<dyn Record>).collect();
        store.add_last(records, &accept_all);
        let pages = Box::new(Pages {
            rows: 500,
            position: 0,
            open: true,
        });
        let _ = store.add_paged_range_last(pages, &accept_all);
    }
    store
}

fn get_across_ranges(c: &mut Criterion) {
    for ranges in [1usize, 4, 16] {
        let mut store = interleaved(ranges);
        let size = store.size();
        c.bench_function(&format!("get_full_scan_{}_ranges", ranges), |b| {
            b.iter(|| {
                for position in 0..size {
                    black_box(store.get(position).is_ok());
                }
            });
        });
    }
}

fn size_with_ranges(c: &mut Criterion) {
    let store = interleaved(8);
    c.bench_function("size_8_ranges", |b| b.iter(|| black_box(store.size())));
}

criterion_group!(benches, get_across_ranges, size_with_ranges);
criterion_main!(benches);
