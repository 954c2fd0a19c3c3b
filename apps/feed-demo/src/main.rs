mod feed;

use std::rc::Rc;

use feed::{Ad, CommentCursor, ConsoleSink, Post, Screen, TextBinding, LIKES_CHANGED};
use polylist::prelude::*;

fn post(author: &str, body: &str) -> Rc<dyn Record> {
    Rc::new(Post {
        author: author.to_string(),
        body: body.to_string(),
    })
}

fn comments() -> CommentCursor {
    CommentCursor::open(
        [("ana", "first!"), ("bo", "nice shot"), ("cy", "where is this?")]
            .into_iter()
            .map(|(who, what)| (who.to_string(), what.to_string()))
            .collect(),
    )
}

/// Binds every position into a fresh holder and prints the screen.
fn render(adapter: &mut ListAdapter, screen: &Screen) -> Result<Vec<Holder>, ListError> {
    screen.borrow_mut().clear();
    let mut holders = Vec::with_capacity(adapter.item_count());
    for position in 0..adapter.item_count() {
        let type_id = adapter.renderer_type_at(position)?;
        let holder = adapter.create_holder(type_id)?;
        adapter.bind_holder(&holder, position)?;
        holders.push(holder);
    }
    for line in screen.borrow().iter() {
        println!("{line}");
    }
    Ok(holders)
}

fn run() -> Result<(), ListError> {
    let screen = Screen::default();
    let mut adapter = ListAdapter::new(AdapterSpec::new().diagnostics(true));
    adapter.attach_sink(Rc::new(ConsoleSink));

    let posts = TextBinding::new(&screen);
    let threads = TextBinding::new(&screen);
    adapter.register::<Post>(&posts);
    let thread_type = adapter.register_paged_range(&threads);
    let ad_type = adapter.register_by_classifier(&posts, 1);
    adapter.set_classifier(|view: &EntryView<'_>, _: Option<usize>| {
        view.as_record()?.downcast_ref::<Ad>().map(|_| 1)
    });
    if let Some(thread_type) = thread_type {
        adapter.extras(thread_type)?.borrow_mut().put("indent", 4usize);
    }

    adapter.set_data(vec![post("dee", "sunset over the bay"), post("eli", "new bike day")]);
    if adapter.add_paged_range(1, Box::new(comments())).is_err() {
        log::warn!("comment thread was not admitted");
    }
    let ad: Rc<dyn Record> = Rc::new(Ad {
        sponsor: "Tea & Co".to_string(),
    });
    adapter.add_last(vec![ad]);
    log::info!("ad renderer type: {:?}", ad_type);

    let holders = render(&mut adapter, &screen)?;

    adapter.notify_changed(0, Some(Payload::new(LIKES_CHANGED).with("likes", 42u32)));
    adapter.bind_holder_partial(&holders[0], 0, &[Payload::new(LIKES_CHANGED).with("likes", 42u32)])?;
    println!("{}", screen.borrow().last().map(String::as_str).unwrap_or_default());

    // Removing the thread closes its cursor.
    adapter.remove_range(1, 3);
    adapter.move_item(0, 2);
    render(&mut adapter, &screen)?;

    adapter.on_lifecycle_event(LifecycleEvent::Pause);
    adapter.on_lifecycle_event(LifecycleEvent::Destroy);
    println!("torn down: {}, items: {}", adapter.is_torn_down(), adapter.item_count());
    Ok(())
}

fn main() {
    #[cfg(feature = "logging")]
    let _ = env_logger::try_init();

    if let Err(err) = run() {
        eprintln!("feed-demo: {err}");
        std::process::exit(1);
    }
}
