//! Behavior tests for the rule store, rules, and styled objects.

use std::cell::RefCell;
use std::rc::Rc;

use scenesheet_core::{StyleMap, StyleValue, style};
use scenesheet_engine::{StyleContext, StyleError, StyleRule, StyledObject};
use scenesheet_materials::{Material, MaterialRegistry, MaterialTarget};
use scenesheet_selectors::{CompoundMatcher, SelectorError};

#[derive(Debug)]
struct RecordedMaterial {
    class_name: String,
}

impl Material for RecordedMaterial {
    fn type_name(&self) -> &str {
        &self.class_name
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn line_registry() -> MaterialRegistry {
    let mut registry = MaterialRegistry::new();
    for class_name in ["LineBasicMaterial", "LineDashedMaterial"] {
        registry.register(class_name, move |_config| {
            Rc::new(RecordedMaterial {
                class_name: class_name.to_string(),
            })
        });
    }
    registry
}

fn test_context() -> StyleContext {
    StyleContext::with_registry(line_registry())
}

#[derive(Default)]
struct SceneNode {
    material: RefCell<Option<Rc<dyn Material>>>,
}

impl SceneNode {
    fn current_type_name(&self) -> Option<String> {
        self.material
            .borrow()
            .as_ref()
            .map(|material| material.type_name().to_string())
    }
}

impl MaterialTarget for SceneNode {
    fn set_material(&self, material: Rc<dyn Material>) {
        *self.material.borrow_mut() = Some(material);
    }
}

#[test]
fn rules_stay_sorted_by_specificity_with_stable_ties() {
    let context = test_context();
    for selector in ["line.foo", "line", ".a", ".b"] {
        context.declare_rule(selector, StyleMap::new()).unwrap();
    }
    let mut seen = Vec::new();
    context.rule_store().each_rule(|rule| {
        seen.push(rule.selector_text().to_string());
    });
    assert_eq!(seen, ["line", ".a", ".b", "line.foo"]);
}

#[test]
fn added_rules_notify_only_at_process_with_one_batch() {
    let context = test_context();
    let batches = Rc::new(RefCell::new(Vec::new()));
    let recorded = Rc::clone(&batches);
    context
        .rule_store()
        .add_rules_added_listener(Rc::new(move |batch| {
            let selectors: Vec<String> = batch
                .iter()
                .map(|rule| rule.selector_text().to_string())
                .collect();
            recorded.borrow_mut().push(selectors);
            Ok(())
        }));
    context.declare_rule("line", StyleMap::new()).unwrap();
    context.declare_rule(".foo", StyleMap::new()).unwrap();
    assert!(batches.borrow().is_empty());
    assert!(context.rule_store().is_dirty());

    context.process().unwrap();
    assert_eq!(
        *batches.borrow(),
        vec![vec!["line".to_string(), ".foo".to_string()]]
    );
    assert!(!context.rule_store().is_dirty());

    context.process().unwrap();
    assert_eq!(batches.borrow().len(), 1);
}

#[test]
fn a_failing_listener_keeps_the_batch_pending() {
    let context = test_context();
    let deliveries = Rc::new(RefCell::new(0_usize));
    let failures_left = Rc::new(RefCell::new(1_usize));
    let delivered = Rc::clone(&deliveries);
    let fuse = Rc::clone(&failures_left);
    context
        .rule_store()
        .add_rules_added_listener(Rc::new(move |batch| {
            *delivered.borrow_mut() += batch.len();
            let mut failures = fuse.borrow_mut();
            if *failures > 0 {
                *failures -= 1;
                return Err(StyleError::Selector(SelectorError::GroupedSelector));
            }
            Ok(())
        }));
    context.declare_rule("line", StyleMap::new()).unwrap();

    let error = context.process().unwrap_err();
    assert_eq!(error, StyleError::Selector(SelectorError::GroupedSelector));
    assert!(context.rule_store().is_dirty());

    context.process().unwrap();
    assert_eq!(*deliveries.borrow(), 2);
    assert!(!context.rule_store().is_dirty());
}

#[test]
fn rules_declared_mid_flush_join_the_list_without_a_batch() {
    let context = test_context();
    let batches = Rc::new(RefCell::new(Vec::new()));
    let recorded = Rc::clone(&batches);
    let late_store = Rc::downgrade(context.rule_store());
    context
        .rule_store()
        .add_rules_added_listener(Rc::new(move |batch| {
            let selectors: Vec<String> = batch
                .iter()
                .map(|rule| rule.selector_text().to_string())
                .collect();
            let first_flush = recorded.borrow().is_empty();
            recorded.borrow_mut().push(selectors);
            if first_flush
                && let Some(store) = late_store.upgrade()
            {
                let late = StyleRule::new(".late", StyleMap::new(), Rc::new(CompoundMatcher))?;
                store.add_rule(late);
            }
            Ok(())
        }));

    context.declare_rule("line", StyleMap::new()).unwrap();
    context.process().unwrap();
    assert_eq!(context.rule_store().len(), 2);
    assert!(!context.rule_store().is_dirty());

    context.process().unwrap();
    assert_eq!(*batches.borrow(), vec![vec!["line".to_string()]]);
}

#[test]
fn update_style_merges_and_notifies_in_subscription_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let context = test_context();
    let rule = context
        .declare_rule("line", style! { "material": "lineBasic", "linewidth": 2 })
        .unwrap();
    let order = Rc::new(RefCell::new(Vec::new()));
    for label in ["first", "second"] {
        let order = Rc::clone(&order);
        rule.add_update_listener(Rc::new(move || {
            order.borrow_mut().push(label);
            Ok(())
        }));
    }

    rule.update_style(&style! { "linewidth": 5, "color": 0x00ff_00ff })
        .unwrap();

    assert_eq!(*order.borrow(), ["first", "second"]);
    let merged = rule.style();
    assert_eq!(merged.get("material"), Some(&StyleValue::from("lineBasic")));
    assert_eq!(merged.get("linewidth"), Some(&StyleValue::from(5)));
    assert_eq!(merged.get("color"), Some(&StyleValue::from(0x00ff_00ff)));
}

#[test]
fn removed_listeners_stop_firing() {
    let context = test_context();
    let rule = context.declare_rule("line", StyleMap::new()).unwrap();
    let hits = Rc::new(RefCell::new(0_usize));
    let counter = Rc::clone(&hits);
    let id = rule.add_update_listener(Rc::new(move || {
        *counter.borrow_mut() += 1;
        Ok(())
    }));

    rule.update_style(&style! { "linewidth": 1 }).unwrap();
    assert_eq!(*hits.borrow(), 1);

    assert!(rule.remove_update_listener(id));
    assert!(!rule.remove_update_listener(id));
    rule.update_style(&style! { "linewidth": 2 }).unwrap();
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn listeners_added_mid_notification_wait_for_the_next_update() {
    let context = test_context();
    let rule = context.declare_rule("line", StyleMap::new()).unwrap();
    let hits = Rc::new(RefCell::new(0_usize));
    let late_hits = Rc::new(RefCell::new(0_usize));

    let seed = Rc::downgrade(&rule);
    let counter = Rc::clone(&hits);
    let late_counter = Rc::clone(&late_hits);
    rule.add_update_listener(Rc::new(move || {
        *counter.borrow_mut() += 1;
        if *counter.borrow() == 1
            && let Some(rule) = seed.upgrade()
        {
            let late = Rc::clone(&late_counter);
            rule.add_update_listener(Rc::new(move || {
                *late.borrow_mut() += 1;
                Ok(())
            }));
        }
        Ok(())
    }));

    rule.update_style(&style! { "linewidth": 1 }).unwrap();
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(*late_hits.borrow(), 0);

    rule.update_style(&style! { "linewidth": 2 }).unwrap();
    assert_eq!(*hits.borrow(), 2);
    assert_eq!(*late_hits.borrow(), 1);
}

#[test]
fn objects_restyle_once_per_flush_even_with_many_matches() {
    let _ = env_logger::builder().is_test(true).try_init();
    let context = test_context();
    context
        .declare_rule("line", style! { "material": "lineBasic" })
        .unwrap();
    context.process().unwrap();

    let object = context.declare_object("line", "", StyleMap::new()).unwrap();
    let notified = Rc::new(RefCell::new(0_usize));
    let counter = Rc::clone(&notified);
    object.add_material_change_listener(Rc::new(move |_material, _style| {
        *counter.borrow_mut() += 1;
    }));

    context
        .declare_rule("line", style! { "linewidth": 1 })
        .unwrap();
    context
        .declare_rule("line", style! { "linewidth": 2 })
        .unwrap();
    context
        .declare_rule("line", style! { "material": "lineDashed" })
        .unwrap();
    context.process().unwrap();

    assert_eq!(*notified.borrow(), 1);
    assert_eq!(
        object.computed_style().get("linewidth"),
        Some(&StyleValue::from(2))
    );
    assert_eq!(object.using_rules().len(), 4);
}

#[test]
fn recomputes_subscribe_to_each_rule_only_once() {
    let context = test_context();
    let rule = context
        .declare_rule("line", style! { "material": "lineBasic" })
        .unwrap();
    context.process().unwrap();
    let object = context.declare_object("line", "", StyleMap::new()).unwrap();
    assert_eq!(rule.update_listener_count(), 1);

    object.add_class("foo").unwrap();
    object.remove_class("foo").unwrap();
    assert_eq!(rule.update_listener_count(), 1);
    assert_eq!(object.using_rules().len(), 1);
}

#[test]
fn class_changes_round_trip_and_deduplicate() {
    let context = test_context();
    context
        .declare_rule("line", style! { "material": "lineBasic" })
        .unwrap();
    context.process().unwrap();
    let object = context
        .declare_object("line", "glow wide", StyleMap::new())
        .unwrap();
    assert_eq!(object.class_str(), "glow wide");

    object.add_class("glow").unwrap();
    assert_eq!(object.class_str(), "glow wide");

    object.add_class("dashed").unwrap();
    assert_eq!(object.class_str(), "glow wide dashed");

    object.remove_class("wide").unwrap();
    assert_eq!(object.class_str(), "glow dashed");
}

#[test]
fn destroyed_objects_ignore_rule_driven_restyles() {
    let context = test_context();
    let rule = context
        .declare_rule("line", style! { "material": "lineBasic" })
        .unwrap();
    context.process().unwrap();
    let object = context.declare_object("line", "", StyleMap::new()).unwrap();
    object.add_material_change_listener(Rc::new(|_material, _style| {}));
    assert_eq!(object.material_change_listener_count(), 1);

    object.destroy();
    assert!(!object.is_live());
    assert_eq!(object.material_change_listener_count(), 0);

    rule.update_style(&style! { "material": "lineDashed" })
        .unwrap();
    assert_eq!(
        object.computed_style().get("material"),
        Some(&StyleValue::from("lineBasic"))
    );
}

#[test]
fn dropped_objects_unhook_without_breaking_updates() {
    let context = test_context();
    let rule = context
        .declare_rule("line", style! { "material": "lineBasic" })
        .unwrap();
    context.process().unwrap();

    let object = StyledObject::new(
        "line",
        "",
        StyleMap::new(),
        Rc::clone(context.rule_store()),
        Rc::clone(context.material_cache()),
        Rc::new(|_derived| {}),
    )
    .unwrap();
    assert_eq!(rule.update_listener_count(), 1);
    drop(object);

    rule.update_style(&style! { "linewidth": 3 }).unwrap();
    assert_eq!(rule.update_listener_count(), 1);
}

#[test]
fn store_listeners_can_unsubscribe() {
    let context = test_context();
    let heard = Rc::new(RefCell::new(0_usize));
    let counter = Rc::clone(&heard);
    let id = context
        .rule_store()
        .add_rules_added_listener(Rc::new(move |_batch| {
            *counter.borrow_mut() += 1;
            Ok(())
        }));

    context.declare_rule("line", StyleMap::new()).unwrap();
    context.process().unwrap();
    assert_eq!(*heard.borrow(), 1);

    assert!(context.rule_store().remove_rules_added_listener(id));
    context.declare_rule(".foo", StyleMap::new()).unwrap();
    context.process().unwrap();
    assert_eq!(*heard.borrow(), 1);
}

#[test]
fn unbinding_a_target_stops_updates() {
    let context = test_context();
    let rule = context
        .declare_rule("line", style! { "material": "lineBasic" })
        .unwrap();
    context.process().unwrap();
    let object = context.declare_object("line", "", StyleMap::new()).unwrap();

    let node = Rc::new(SceneNode::default());
    let id = object.apply_material_on_change(Rc::<SceneNode>::clone(&node));
    assert_eq!(node.current_type_name().as_deref(), Some("LineBasicMaterial"));

    assert!(object.remove_material_change_listener(id));
    rule.update_style(&style! { "material": "lineDashed" })
        .unwrap();
    assert_eq!(
        object
            .material()
            .map(|material| material.type_name().to_string()),
        Some("LineDashedMaterial".to_string())
    );
    assert_eq!(node.current_type_name().as_deref(), Some("LineBasicMaterial"));
}

#[test]
fn derived_objects_see_rules_that_are_still_pending() {
    let context = test_context();
    context
        .declare_rule("line", style! { "material": "lineBasic" })
        .unwrap();
    context.process().unwrap();
    let template = context.declare_object("line", "", StyleMap::new()).unwrap();

    context
        .declare_rule("line.dashed", style! { "material": "lineDashed" })
        .unwrap();
    let derived = template
        .create_derived_object("dashed", StyleMap::new())
        .unwrap();

    assert_eq!(
        derived
            .material()
            .map(|material| material.type_name().to_string()),
        Some("LineDashedMaterial".to_string())
    );
    assert_eq!(
        template
            .material()
            .map(|material| material.type_name().to_string()),
        Some("LineBasicMaterial".to_string())
    );
    assert_eq!(derived.class_str(), "dashed");
    assert_eq!(context.object_count(), 2);
}
