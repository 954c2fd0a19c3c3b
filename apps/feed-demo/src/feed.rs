//! Records, bindings and the comment cursor shown by the demo feed.

use std::cell::RefCell;
use std::rc::Rc;

use polylist::prelude::*;

#[derive(Debug)]
pub struct Post {
    pub author: String,
    pub body: String,
}

impl Record for Post {}

#[derive(Debug)]
pub struct Ad {
    pub sponsor: String,
}

impl Record for Ad {}

/// Partial update kind: only the like counter changed.
pub const LIKES_CHANGED: i32 = 1;

/// Read-only comment table standing in for a database query.
#[derive(Debug)]
pub struct CommentCursor {
    rows: Vec<(String, String)>,
    position: usize,
    open: bool,
}

impl CommentCursor {
    pub fn open(rows: Vec<(String, String)>) -> Self {
        Self {
            rows,
            position: 0,
            open: true,
        }
    }

    pub fn current(&self) -> Option<&(String, String)> {
        self.rows.get(self.position)
    }
}

impl PagedRange for CommentCursor {
    fn count(&self) -> usize {
        self.rows.len()
    }

    fn seek(&mut self, local_offset: usize) {
        self.position = local_offset;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) {
        log::info!("comment cursor closed after {} rows", self.rows.len());
        self.open = false;
    }
}

/// Shared output buffer every holder writes its line into.
pub type Screen = Rc<RefCell<Vec<String>>>;

pub struct TextBinding {
    screen: Screen,
}

impl TextBinding {
    pub fn new(screen: &Screen) -> Rc<dyn RendererBinding> {
        Rc::new(Self {
            screen: Rc::clone(screen),
        })
    }
}

impl RendererBinding for TextBinding {
    fn create_holder(&self, type_id: RendererTypeId, extras: Rc<RefCell<BindingExtras>>) -> HolderRef {
        Rc::new(RefCell::new(TextHolder {
            type_id,
            screen: Rc::clone(&self.screen),
            extras,
        }))
    }

    fn supports_lifecycle(&self) -> bool {
        true
    }
}

struct TextHolder {
    type_id: RendererTypeId,
    screen: Screen,
    extras: Rc<RefCell<BindingExtras>>,
}

impl TextHolder {
    fn indent(&self) -> usize {
        self.extras
            .borrow()
            .get::<usize>("indent")
            .map(|indent| *indent)
            .unwrap_or(0)
    }
}

impl ViewHolder for TextHolder {
    fn bind(&mut self, position: usize, entry: EntryView<'_>) {
        let text = if let Some(post) = entry.as_record().and_then(|record| record.downcast_ref::<Post>()) {
            format!("{}: {}", post.author, post.body)
        } else if let Some(ad) = entry.as_record().and_then(|record| record.downcast_ref::<Ad>()) {
            format!("[sponsored by {}]", ad.sponsor)
        } else if let Some((who, what)) = entry
            .as_range()
            .and_then(|range| range.downcast_ref::<CommentCursor>())
            .and_then(CommentCursor::current)
        {
            format!("{:indent$}> {}: {}", "", who, what, indent = self.indent())
        } else {
            entry.describe()
        };
        self.screen
            .borrow_mut()
            .push(format!("{position:>2} [type {}] {text}", self.type_id));
    }

    fn bind_partial(&mut self, position: usize, _entry: EntryView<'_>, payload: &Payload) {
        let likes = payload.get::<u32>("likes").copied().unwrap_or_default();
        self.screen
            .borrow_mut()
            .push(format!("{position:>2} [type {}] likes -> {likes}", self.type_id));
    }

    fn on_lifecycle_event(&mut self, event: LifecycleEvent) {
        log::debug!("holder of type {} saw {:?}", self.type_id, event);
    }
}

/// Prints notifications as the rendering layer would receive them.
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn on_inserted(&self, index: usize, count: usize) {
        println!("~ inserted {count} at {index}");
    }

    fn on_removed(&self, index: usize, count: usize) {
        println!("~ removed {count} at {index}");
    }

    fn on_changed(&self, index: usize, payload: Option<&Payload>) {
        match payload {
            Some(payload) => println!("~ changed {index} (partial kind {})", payload.kind()),
            None => println!("~ changed {index}"),
        }
    }

    fn on_range_changed(&self, start: usize, count: usize) {
        println!("~ range changed {start}..{}", start + count);
    }

    fn on_data_set_changed(&self) {
        println!("~ everything changed");
    }
}
