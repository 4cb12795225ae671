use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{Value, json};

use jpview::display::DisplayOrchestrator;
use jpview::host::{BufferId, Host, MemoryHost};
use jpview::registry::BufferRegistry;

#[derive(Debug, Clone)]
enum Event {
    OpenSource,
    Resolve(usize),
    Show(usize),
    QueryFromResult(usize),
    WipeResult(usize),
    UnloadResult(usize),
    HideResult(usize),
    WipeSource(usize),
    Release(usize),
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        1 => Just(Event::OpenSource),
        3 => any::<usize>().prop_map(Event::Resolve),
        3 => any::<usize>().prop_map(Event::Show),
        2 => any::<usize>().prop_map(Event::QueryFromResult),
        1 => any::<usize>().prop_map(Event::WipeResult),
        1 => any::<usize>().prop_map(Event::UnloadResult),
        2 => any::<usize>().prop_map(Event::HideResult),
        1 => any::<usize>().prop_map(Event::WipeSource),
        1 => any::<usize>().prop_map(Event::Release),
    ]
}

/// Text with the characters some editors treat as line breaks.
fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[a-z\u{2028}\u{2029}\u{85}\r\u{b}\u{c}\n\" ]{0,8}",
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1_000_000i32..1_000_000).prop_map(|n| Value::from(f64::from(n) / 4.0)),
        text().prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            proptest::collection::btree_map(text(), inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn pick(sources: &[BufferId], idx: usize) -> BufferId {
    sources[idx % sources.len()]
}

/// Queries only ever run against a buffer the user can still focus.
fn pick_live(host: &mut MemoryHost, sources: &[BufferId], idx: usize) -> Option<BufferId> {
    let live: Vec<_> = sources
        .iter()
        .copied()
        .filter(|&source| host.is_buffer_valid(source).unwrap())
        .collect();
    (!live.is_empty()).then(|| live[idx % live.len()])
}

fn assert_consistent(host: &mut MemoryHost, registry: &BufferRegistry) {
    let mut results = BTreeSet::new();
    for (source, result) in registry.bindings() {
        assert!(results.insert(result), "{result} bound twice");
        assert!(host.is_buffer_valid(result).unwrap(), "{result} is wiped");
        assert!(host.is_buffer_loaded(result).unwrap(), "{result} is unloaded");
        let hidden = !host.is_buffer_visible(result).unwrap();
        let orphaned = !host.is_buffer_valid(source).unwrap();
        assert!(!(hidden && orphaned), "{result} hidden with {source} gone");
    }
}

proptest! {
    #[test]
    fn test_registry_stays_consistent(events in proptest::collection::vec(event(), 1..40)) {
        let mut host = MemoryHost::new();
        let mut registry = BufferRegistry::new();
        let display = DisplayOrchestrator::default();
        let mut sources = vec![host.open_source("{\"n\": 0}")];

        for event in events {
            match event {
                Event::OpenSource => {
                    let n = sources.len();
                    sources.push(host.open_source(&format!("{{\"n\": {n}}}")));
                }
                Event::Resolve(idx) => {
                    let Some(source) = pick_live(&mut host, &sources, idx) else {
                        continue;
                    };
                    let result = registry.resolve(&mut host, source).unwrap();
                    assert_consistent(&mut host, &registry);
                    prop_assert_eq!(registry.resolve(&mut host, source).unwrap(), result);
                }
                Event::Show(idx) => {
                    let Some(source) = pick_live(&mut host, &sources, idx) else {
                        continue;
                    };
                    let focused = host.focused_window();
                    let result = display
                        .show(&mut host, &mut registry, source, &json!({"src": source.0}))
                        .unwrap();
                    prop_assert_eq!(host.focused_window(), focused);
                    prop_assert!(host.is_buffer_visible(result).unwrap());
                    assert_consistent(&mut host, &registry);
                }
                Event::QueryFromResult(idx) => {
                    let Some(source) = pick_live(&mut host, &sources, idx) else {
                        continue;
                    };
                    registry.reconcile(&mut host).unwrap();
                    let Some(result) = registry.get(source) else {
                        continue;
                    };
                    let nested = display
                        .show(&mut host, &mut registry, result, &json!({"from": result.0}))
                        .unwrap();
                    prop_assert_eq!(registry.get(result), Some(nested));
                    assert_consistent(&mut host, &registry);
                    if !sources.contains(&result) {
                        sources.push(result);
                    }
                }
                Event::WipeResult(idx) => {
                    if let Some(result) = registry.get(pick(&sources, idx)) {
                        host.wipe_buffer(result);
                    }
                }
                Event::UnloadResult(idx) => {
                    if let Some(result) = registry.get(pick(&sources, idx)) {
                        host.unload_buffer(result);
                    }
                }
                Event::HideResult(idx) => {
                    if let Some(result) = registry.get(pick(&sources, idx)) {
                        for window in host.windows_showing(result) {
                            host.close_window(window);
                        }
                    }
                }
                Event::WipeSource(idx) => {
                    host.wipe_buffer(pick(&sources, idx));
                }
                Event::Release(idx) => {
                    let source = pick(&sources, idx);
                    let bound = registry.get(source);
                    let released = registry.release(&mut host, source).unwrap();
                    prop_assert_eq!(released, bound);
                    prop_assert!(registry.get(source).is_none());
                }
            }
        }

        registry.reconcile(&mut host).unwrap();
        assert_consistent(&mut host, &registry);
    }

    #[test]
    fn test_show_round_trips_value(value in json_value()) {
        let mut host = MemoryHost::new();
        let source = host.open_source("{}");
        let mut registry = BufferRegistry::new();

        let result = DisplayOrchestrator::default()
            .show(&mut host, &mut registry, source, &value)
            .unwrap();

        let decoded = jpview::plugin::read_json(&mut host, result).unwrap();
        prop_assert_eq!(decoded, value);
    }
}
