use std::rc::Rc;

use polylist_core::{Payload, Record, Tagged};
use polylist_foundation::{EntryView, ListError, RendererTypeId};
use polylist_testing::prelude::*;
use polylist_ui::{AdapterSpec, LifecycleEvent};

fn bound_entries(events: &[BindEvent]) -> Vec<(usize, String)> {
    events
        .iter()
        .filter_map(|event| match event {
            BindEvent::Bound { position, entry, .. } => Some((*position, entry.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn paged_range_then_plain_record_end_to_end() {
    let mut rule = AdapterTestRule::new();
    let photos = RecordingBinding::new("photo").into_rc();
    let articles = RecordingBinding::new("article").into_rc();
    let rows = RecordingBinding::new("rows").into_rc();

    let adapter = rule.adapter();
    assert_eq!(adapter.register::<Photo>(&photos), Some(RendererTypeId(101)));
    assert_eq!(adapter.register::<Article>(&articles), Some(RendererTypeId(102)));
    let rows_id = adapter.register_paged_range(&rows).unwrap();

    let (cursor, probe) = FakeCursor::boxed(cursor_rows(2));
    assert!(adapter.add_paged_range(0, cursor).is_ok());
    assert!(adapter.add(2, vec![photo(1)]).is_some());

    assert_eq!(adapter.item_count(), 3);
    assert_eq!(adapter.renderer_type_at(0), Ok(rows_id));
    assert_eq!(adapter.renderer_type_at(2), Ok(RendererTypeId(101)));

    adapter.remove_range(0, 2);
    assert_eq!(probe.close_count(), 1);
    assert_eq!(adapter.item_count(), 1);
    let first = adapter
        .record_at(0)
        .unwrap()
        .as_record()
        .and_then(|record| record.downcast_ref::<Photo>())
        .cloned();
    assert_eq!(first, Some(Photo::new(1)));

    rule.assert_notified(&[
        Notification::Inserted { index: 0, count: 2 },
        Notification::Inserted { index: 2, count: 1 },
        Notification::Removed { index: 0, count: 2 },
    ]);
    rule.assert_size_invariant();

    drop(rule);
    assert_eq!(probe.close_count(), 1);
}

#[test]
fn every_mutation_reports_its_change() {
    let mut rule = AdapterTestRule::new();
    let photos = RecordingBinding::new("photo").into_rc();
    let rows = RecordingBinding::new("rows").into_rc();
    let adapter = rule.adapter();
    adapter.register::<Photo>(&photos);
    adapter.register_paged_range(&rows);

    adapter.add_last(vec![photo(1), photo(2), photo(3), photo(4)]);
    adapter.update(1, photo(20), Some(Payload::new(5)));
    adapter.notify_changed(2, None);
    adapter.move_item(0, 3);
    adapter.remove_at(0);
    adapter.remove_range(1, 0);
    adapter.set_data(vec![photo(7)]);

    rule.assert_notified(&[
        Notification::Inserted { index: 0, count: 4 },
        Notification::Changed {
            index: 1,
            payload_kind: Some(5),
        },
        Notification::Changed {
            index: 2,
            payload_kind: None,
        },
        Notification::RangeChanged { start: 0, count: 4 },
        Notification::Removed { index: 0, count: 1 },
        Notification::Removed { index: 1, count: 0 },
        Notification::DataSetChanged,
    ]);
    rule.assert_item_count(1);
}

#[test]
fn rejected_mutations_notify_nothing() {
    let mut rule = AdapterTestRule::new();
    let photos = RecordingBinding::new("photo").into_rc();
    let rows = RecordingBinding::new("rows").into_rc();
    let adapter = rule.adapter();
    adapter.register::<Photo>(&photos);
    adapter.register_paged_range(&rows);
    adapter.add_last(vec![photo(1), photo(2)]);
    let (cursor, probe) = FakeCursor::boxed(cursor_rows(3));
    adapter.add_paged_range(1, cursor).unwrap();
    rule.take_notifications();

    let adapter = rule.adapter();
    assert!(adapter.add(0, vec![article(1, "unregistered")]).is_none());
    assert!(adapter.add(3, vec![photo(3)]).is_none());
    assert!(adapter.add(7, vec![photo(3)]).is_none());
    assert!(adapter.move_item(0, 2).is_none());
    assert!(adapter.update(9, photo(9), None).is_none());
    assert!(adapter.set_data(Vec::new()).is_none());
    let (empty, empty_probe) = FakeCursor::boxed(Vec::<String>::new());
    assert!(adapter.add_paged_range_last(empty).is_err());

    assert!(rule.sink().is_empty());
    rule.assert_item_count(5);
    assert!(!probe.is_closed());
    assert!(!empty_probe.is_closed());
}

#[test]
fn removal_cutting_a_range_is_announced_but_not_applied() {
    let mut rule = AdapterTestRule::new();
    let photos = RecordingBinding::new("photo").into_rc();
    let rows = RecordingBinding::new("rows").into_rc();
    let adapter = rule.adapter();
    adapter.register::<Photo>(&photos);
    adapter.register_paged_range(&rows);
    adapter.add_last(vec![photo(1)]);
    let (cursor, probe) = FakeCursor::boxed(cursor_rows(3));
    adapter.add_paged_range_last(cursor).unwrap();
    rule.take_notifications();

    rule.adapter().remove_range(0, 2);

    rule.assert_notified(&[Notification::Removed { index: 0, count: 2 }]);
    rule.assert_item_count(4);
    assert!(!probe.is_closed());
}

#[test]
fn holders_bind_plain_records_and_seeked_cursor_rows() {
    let mut rule = AdapterTestRule::new();
    let photo_binding = RecordingBinding::new("photo");
    let photo_events = photo_binding.events();
    let rows_binding = RecordingBinding::new("rows");
    let rows_events = rows_binding.events();
    let adapter = rule.adapter();
    adapter.register::<Photo>(&photo_binding.into_rc());
    adapter.register_paged_range(&rows_binding.into_rc());

    adapter.add_last(vec![photo(1), photo(2)]);
    let (cursor, probe) = FakeCursor::boxed(cursor_rows(3));
    adapter.add_paged_range(1, cursor).unwrap();

    let holders = rule.bind_all().unwrap();
    assert_eq!(holders.len(), 5);
    assert_eq!(probe.position(), Some(2));
    assert_eq!(
        bound_entries(&rows_events.borrow()),
        vec![
            (1, "row-0".to_string()),
            (2, "row-1".to_string()),
            (3, "row-2".to_string()),
        ]
    );
    assert_eq!(
        bound_entries(&photo_events.borrow()),
        vec![
            (0, format!("{:?}", Photo::new(1))),
            (4, format!("{:?}", Photo::new(2))),
        ]
    );
}

#[test]
fn partial_binds_follow_payloads() {
    let mut rule = AdapterTestRule::new();
    let binding = RecordingBinding::new("photo");
    let events = binding.events();
    let adapter = rule.adapter();
    let id = adapter.register::<Photo>(&binding.into_rc()).unwrap();
    adapter.add_last(vec![photo(1)]);
    let holder = adapter.create_holder(id).unwrap();

    adapter.update(0, photo(2), Some(Payload::new(3)));
    adapter
        .bind_holder_partial(&holder, 0, &[Payload::new(3)])
        .unwrap();
    adapter.bind_holder_partial(&holder, 0, &[]).unwrap();

    assert_eq!(
        *events.borrow(),
        vec![
            BindEvent::Created {
                binding: "photo",
                type_id: id,
            },
            BindEvent::Partial {
                binding: "photo",
                position: 0,
                kind: 3,
            },
            BindEvent::Bound {
                binding: "photo",
                position: 0,
                entry: format!("{:?}", Photo::new(2)),
            },
        ]
    );
}

#[test]
fn destroy_closes_ranges_and_tears_down_once() {
    let mut rule = AdapterTestRule::new();
    let binding = RecordingBinding::new("photo").lifecycle_aware();
    let events = binding.events();
    let rows = RecordingBinding::new("rows").into_rc();
    let adapter = rule.adapter();
    adapter.register::<Photo>(&binding.into_rc());
    adapter.register_paged_range(&rows);
    adapter.add_last(vec![photo(1)]);
    let (cursor, probe) = FakeCursor::boxed(cursor_rows(2));
    adapter.add_paged_range_last(cursor).unwrap();
    let _holders = rule.bind_all().unwrap();
    rule.take_notifications();

    let adapter = rule.adapter();
    adapter.on_lifecycle_event(LifecycleEvent::Resume);
    adapter.on_lifecycle_event(LifecycleEvent::Destroy);

    let lifecycle: Vec<LifecycleEvent> = events
        .borrow()
        .iter()
        .filter_map(|event| match event {
            BindEvent::Lifecycle { event, .. } => Some(*event),
            _ => None,
        })
        .collect();
    assert_eq!(lifecycle, vec![LifecycleEvent::Resume, LifecycleEvent::Destroy]);
    assert_eq!(probe.close_count(), 1);

    let adapter = rule.adapter();
    assert!(adapter.is_torn_down());
    assert_eq!(adapter.item_count(), 0);
    assert_eq!(adapter.renderer_type_at(0), Err(ListError::TornDown));
    assert!(adapter.record_at(0).is_err());
    assert!(adapter.add_last(vec![photo(2)]).is_none());
    assert!(adapter.remove_range(0, 1).is_none());
    let (late, late_probe) = FakeCursor::boxed(cursor_rows(1));
    assert!(adapter.add_paged_range_first(late).is_err());
    adapter.tear_down();

    assert!(rule.sink().is_empty());
    drop(rule);
    assert_eq!(probe.close_count(), 1);
    assert!(!late_probe.is_closed());
}

#[test]
fn external_row_count_changes_are_picked_up() {
    let mut rule = AdapterTestRule::new();
    let photos = RecordingBinding::new("photo").into_rc();
    let rows = RecordingBinding::new("rows").into_rc();
    let adapter = rule.adapter();
    let photo_id = adapter.register::<Photo>(&photos).unwrap();
    let rows_id = adapter.register_paged_range(&rows).unwrap();
    let (cursor, probe) = FakeCursor::boxed(cursor_rows(2));
    adapter.add_paged_range_first(cursor).unwrap();
    adapter.add_last(vec![photo(1)]);

    probe.push_row("row-2".to_string());
    rule.assert_item_count(4);
    rule.assert_size_invariant();
    assert_eq!(
        rule.renderer_types(),
        vec![Ok(rows_id), Ok(rows_id), Ok(rows_id), Ok(photo_id)]
    );

    probe.truncate(0);
    rule.assert_item_count(1);
    rule.assert_size_invariant();
    assert_eq!(rule.renderer_types(), vec![Ok(photo_id)]);
}

#[test]
fn tags_and_classifier_values_pick_renderers() {
    let mut rule = AdapterTestRule::with_spec(AdapterSpec::new().reserved_type_limit(10));
    let photos = RecordingBinding::new("photo").into_rc();
    let banner = RecordingBinding::new("banner").full_span().into_rc();
    let even = RecordingBinding::new("even").span(2).into_rc();

    let adapter = rule.adapter();
    let photo_id = adapter.register::<Photo>(&photos).unwrap();
    let banner_id = adapter.register_tag(&banner, 7).unwrap();
    let even_id = adapter.register_by_classifier(&even, 3).unwrap();
    assert_eq!(
        (photo_id, banner_id, even_id),
        (RendererTypeId(11), RendererTypeId(12), RendererTypeId(13))
    );
    assert_eq!(adapter.register_by_classifier(&even, 11), None);

    // Only positioned photos at even positions are classified.
    adapter.set_classifier(|view: &EntryView<'_>, position: Option<usize>| {
        let position = position?;
        let is_photo = view.as_record().is_some_and(|record| record.is::<Photo>());
        (is_photo && position % 2 == 0).then_some(3)
    });

    let sale: Rc<dyn Record> = Rc::new(Tagged::with(7, "sale".to_string()));
    let untagged: Rc<dyn Record> = Rc::new(Tagged::<String>::of(8));
    adapter.add_last(vec![sale, photo(1), photo(2), untagged]);

    assert_eq!(
        rule.renderer_types(),
        vec![Ok(banner_id), Ok(photo_id), Ok(even_id)]
    );
    let adapter = rule.adapter();
    assert_eq!(adapter.span_size_at(0, 4), Ok(4));
    assert_eq!(adapter.span_size_at(1, 4), Ok(1));
    assert_eq!(adapter.span_size_at(2, 4), Ok(2));
    assert_eq!(adapter.is_full_span(banner_id), Ok(true));

    adapter.clear_classifier();
    assert_eq!(adapter.renderer_type_at(2), Ok(photo_id));
}

#[test]
fn rejected_range_can_be_offered_again() {
    let mut rule = AdapterTestRule::new();
    let rows = RecordingBinding::new("rows").into_rc();
    let adapter = rule.adapter();

    let (cursor, probe) = FakeCursor::boxed(cursor_rows(2));
    let cursor = adapter.add_paged_range(0, cursor).unwrap_err();
    assert!(!probe.is_closed());

    adapter.register_paged_range(&rows);
    assert!(adapter.add_paged_range(0, cursor).is_ok());
    assert_eq!(adapter.paged_range_count(), 1);
    rule.assert_notified(&[Notification::Inserted { index: 0, count: 2 }]);
}

#[test]
fn records_are_found_by_key() {
    let mut rule = AdapterTestRule::new();
    let photos = RecordingBinding::new("photo").into_rc();
    let articles = RecordingBinding::new("article").into_rc();
    let adapter = rule.adapter();
    adapter.register::<Photo>(&photos);
    adapter.register::<Article>(&articles);
    adapter.set_data(vec![photo(1), article(2, "first")]);

    assert_eq!(adapter.find_logical_index(&article(9, "other")), Some(1));
    adapter.update_record(photo(9), None);
    let changes = adapter.remove_records(&[article(5, "gone"), article(6, "missing")]);
    assert_eq!(changes.len(), 1);

    let stored = adapter
        .record_at(0)
        .unwrap()
        .as_record()
        .and_then(|record| record.downcast_ref::<Photo>())
        .map(|photo| photo.id);
    assert_eq!(stored, Some(9));
    rule.assert_notified(&[
        Notification::DataSetChanged,
        Notification::Changed {
            index: 0,
            payload_kind: None,
        },
        Notification::Removed { index: 1, count: 1 },
    ]);
}

#[test]
fn position_dependent_classifier_does_not_hide_records() {
    let mut rule = AdapterTestRule::new();
    let photos = RecordingBinding::new("photo").into_rc();
    let featured = RecordingBinding::new("featured").into_rc();
    let adapter = rule.adapter();
    adapter.register::<Photo>(&photos);
    let featured_id = adapter.register_by_classifier(&featured, 1).unwrap();
    adapter.set_classifier(|_: &EntryView<'_>, position: Option<usize>| {
        (position == Some(0)).then_some(1)
    });
    adapter.add_last(vec![photo(1)]);

    assert_eq!(adapter.renderer_type_at(0), Ok(featured_id));
    assert_eq!(adapter.find_logical_index(&photo(1)), Some(0));
    assert!(adapter.update_record(photo(9), None).is_some());
    assert_eq!(adapter.remove_records(&[photo(9)]).len(), 1);
    rule.assert_item_count(0);
}

#[test]
fn extras_are_kept_per_binding() {
    let mut rule = AdapterTestRule::new();
    let adapter = rule.adapter();
    let id = adapter
        .register::<Photo>(&RecordingBinding::new("photo").into_rc())
        .unwrap();
    adapter.extras(id).unwrap().borrow_mut().put("thumb", 64u32);
    assert_eq!(
        adapter.extras(RendererTypeId(1)).err(),
        Some(ListError::UnknownRendererType {
            type_id: RendererTypeId(1)
        })
    );

    adapter.add_last(vec![photo(1)]);
    let holders = rule.bind_all().unwrap();
    assert_eq!(holders[0].type_id(), id);

    let thumb = rule.adapter().extras(id).unwrap().borrow().get::<u32>("thumb");
    assert_eq!(thumb.map(|value| *value), Ok(64));
}
