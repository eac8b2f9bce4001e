use std::{cell::RefCell, io::Cursor, rc::Rc};

use super::*;
use crate::assets::{
    handle::HandleRegistry,
    validate::{FileValidator, RawFile},
};

fn asset(registry: &HandleRegistry, name: &str) -> DesignAsset {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    FileValidator::default()
        .validate(&RawFile::new(name, "image/png", buf), registry)
        .unwrap()
}

fn recording(store: &mut DesignerStore) -> Rc<RefCell<Vec<StateChange>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |change, _| sink.borrow_mut().push(change));
    seen
}

#[test]
fn defaults() {
    let store = DesignerStore::new();
    let s = store.state();
    assert_eq!(s.base_color, ColorValue::WHITE);
    assert!(s.design.is_none());
    assert_eq!(s.active_view, Panel::Front);
    assert!(s.is_loading);
}

#[test]
fn every_mutation_notifies_with_new_state_visible() {
    let mut store = DesignerStore::new();
    let colors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&colors);
    store.subscribe(move |_, state| sink.borrow_mut().push(state.base_color));
    let seen = recording(&mut store);

    let red = ColorValue::rgb(0xE6, 0x39, 0x46);
    store.set_base_color(red);
    store.set_active_view(Panel::Back);
    store.set_loading(false);

    assert_eq!(
        *seen.borrow(),
        vec![
            StateChange::BaseColor,
            StateChange::ActiveView,
            StateChange::Loading
        ]
    );
    assert_eq!(colors.borrow()[0], red);
    assert_eq!(store.state().active_view, Panel::Back);
    assert!(!store.state().is_loading);
}

#[test]
fn set_design_twice_releases_first_exactly_once() {
    let registry = HandleRegistry::new();
    let mut store = DesignerStore::new();

    let first = asset(&registry, "first.png");
    let first_id = first.id();
    store.set_design(first);
    assert_eq!(registry.live_count(), 1);

    let second = asset(&registry, "second.png");
    let second_id = second.id();
    store.set_design(second);

    assert!(!registry.is_live(first_id));
    assert!(registry.is_live(second_id));
    assert_eq!(registry.live_count(), 1);
    assert_eq!(registry.released_count(), 1);
    assert_eq!(
        store.state().composite_inputs().design,
        Some(second_id)
    );
}

#[test]
fn clear_design_releases_and_is_noop_when_empty() {
    let registry = HandleRegistry::new();
    let mut store = DesignerStore::new();
    let seen = recording(&mut store);

    store.clear_design();
    assert!(seen.borrow().is_empty());

    store.set_design(asset(&registry, "a.png"));
    store.clear_design();
    store.clear_design();

    assert_eq!(registry.live_count(), 0);
    assert_eq!(registry.released_count(), 1);
    assert_eq!(*seen.borrow(), vec![StateChange::Design, StateChange::Design]);
}

#[test]
fn dropping_store_releases_design() {
    let registry = HandleRegistry::new();
    let mut store = DesignerStore::new();
    store.set_design(asset(&registry, "a.png"));
    drop(store);
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn unsubscribe_stops_notifications() {
    let mut store = DesignerStore::new();
    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    let id = store.subscribe(move |_, _| *sink.borrow_mut() += 1);

    store.set_loading(false);
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.set_loading(true);
    assert_eq!(*seen.borrow(), 1);
}

#[test]
fn loading_does_not_touch_texture() {
    assert!(!StateChange::Loading.touches_texture());
    for c in [
        StateChange::BaseColor,
        StateChange::Design,
        StateChange::ActiveView,
    ] {
        assert!(c.touches_texture());
    }
}
