//! Integration tests for controller sharing between behavior aspects.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_controls::ObservableProperty;
use horizon_controls::behavior::{
    BehaviorAspect, BehaviorConfiguration, Controller, ControllerKind, HandlerRegistry,
};
use horizon_controls::control::{Control, ControlBase};
use horizon_controls::error::ConfigurationError;
use horizon_controls::event::{ControlEvent, EventType};
use parking_lot::Mutex;

#[derive(Default)]
struct Spinner {
    base: ControlBase,
    value: ObservableProperty<i32>,
    created: AtomicUsize,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Control for Spinner {
    fn control_base(&self) -> &ControlBase {
        &self.base
    }
}

struct Step {
    value: ObservableProperty<i32>,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Controller for Step {}

struct Wrap {
    step: Step,
}

impl Controller for Wrap {
    fn parent_kind() -> Option<ControllerKind> {
        Some(ControllerKind::of::<Step>())
    }

    fn as_parent(&self) -> Option<&dyn Controller> {
        Some(&self.step)
    }
}

struct Clamp {
    step: Step,
}

impl Controller for Clamp {
    fn parent_kind() -> Option<ControllerKind> {
        Some(ControllerKind::of::<Step>())
    }

    fn as_parent(&self) -> Option<&dyn Controller> {
        Some(&self.step)
    }
}

fn counted_step(spinner: &Spinner) -> Step {
    spinner.created.fetch_add(1, Ordering::SeqCst);
    Step {
        value: spinner.value.clone(),
        log: spinner.log.clone(),
    }
}

fn step_aspect() -> BehaviorAspect<Spinner> {
    let mut aspect = BehaviorAspect::<Spinner>::builder(counted_step);
    aspect.register_event_handler(EventType::Action, |step: &Step, _| {
        step.value.set(step.value.get() + 1);
    });
    aspect.build()
}

fn wrap_aspect() -> BehaviorAspect<Spinner> {
    let mut aspect = BehaviorAspect::<Spinner>::builder(|spinner: &Spinner| Wrap {
        step: counted_step(spinner),
    });
    aspect.register_event_handler(EventType::Action, |wrap: &Wrap, event: &mut ControlEvent| {
        if wrap.step.value.get() > 2 {
            wrap.step.value.set(0);
            event.consume();
        }
    });
    aspect.build()
}

fn clamp_aspect() -> BehaviorAspect<Spinner> {
    let mut aspect = BehaviorAspect::<Spinner>::builder(|spinner: &Spinner| Clamp {
        step: counted_step(spinner),
    });
    aspect.register_event_handler(EventType::Action, |_: &Clamp, _| {});
    aspect.build()
}

#[test]
fn test_ancestor_lookup_uses_descendant_factory() {
    let configuration = BehaviorConfiguration::new([step_aspect(), wrap_aspect()]).unwrap();
    let step = configuration.factory_of::<Step>().unwrap();
    let wrap = configuration.factory_of::<Wrap>().unwrap();
    assert_eq!(step, wrap);
    assert_eq!(step.kind(), ControllerKind::of::<Wrap>());
}

#[test]
fn test_divergent_descendants_are_rejected() {
    let result = BehaviorConfiguration::new([step_aspect(), wrap_aspect(), clamp_aspect()]);
    assert!(matches!(result, Err(ConfigurationError::DivergentControllers { .. })));

    let error: horizon_controls::Error = result.err().unwrap().into();
    assert!(error.to_string().contains("divergent"));
}

#[test]
fn test_one_controller_serves_both_aspects() {
    let configuration = BehaviorConfiguration::new([step_aspect(), wrap_aspect()]).unwrap();
    let spinner = Arc::new(Spinner::default());
    spinner.install_behavior(&configuration);
    assert_eq!(spinner.created.load(Ordering::SeqCst), 0);

    assert!(!spinner.dispatch_event(&mut ControlEvent::action()));
    assert!(!spinner.dispatch_event(&mut ControlEvent::action()));
    assert_eq!(spinner.value.get(), 2);

    // The wrap handler sees the step handler's increment.
    assert!(spinner.dispatch_event(&mut ControlEvent::action()));
    assert_eq!(spinner.value.get(), 0);
    assert_eq!(spinner.created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_property_listeners_run_in_aspect_order() {
    let mut first = BehaviorAspect::<Spinner>::builder(counted_step);
    first.register_property_listener(
        |spinner: &Spinner| spinner.value.clone(),
        |step: &Step, _: &i32| step.log.lock().push("p1"),
    );
    let mut second = BehaviorAspect::<Spinner>::builder(counted_step);
    second.register_property_listener(
        |spinner: &Spinner| spinner.value.clone(),
        |step: &Step, _: &i32| step.log.lock().push("p2"),
    );
    let configuration = BehaviorConfiguration::builder()
        .aspect(first.build())
        .aspect(second.build())
        .build()
        .unwrap();

    let spinner = Arc::new(Spinner::default());
    spinner.install_behavior(&configuration);

    spinner.value.set(5);
    spinner.value.set(6);
    assert_eq!(*spinner.log.lock(), vec!["p1", "p2", "p1", "p2"]);
    assert_eq!(spinner.created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_double_unsubscribe_leaves_no_handlers() {
    let configuration = BehaviorConfiguration::new([step_aspect(), wrap_aspect()]).unwrap();
    let spinner = Arc::new(Spinner::default());
    let subscription = configuration.install(&spinner);
    assert_eq!(spinner.control_base().handler_count(EventType::Action), 2);

    subscription.unsubscribe();
    subscription.unsubscribe();
    assert!(subscription.is_cancelled());
    assert_eq!(spinner.control_base().handler_count(EventType::Action), 0);

    assert!(!spinner.dispatch_event(&mut ControlEvent::action()));
    assert_eq!(spinner.value.get(), 0);
    assert_eq!(spinner.created.load(Ordering::SeqCst), 0);
}

#[test]
fn test_repeated_uninstall_is_harmless() {
    let configuration = BehaviorConfiguration::new([step_aspect(), wrap_aspect()]).unwrap();
    let spinner = Arc::new(Spinner::default());
    spinner.install_behavior(&configuration);

    spinner.uninstall_behavior();
    spinner.uninstall_behavior();
    assert_eq!(spinner.control_base().handler_count(EventType::Action), 0);
    assert!(!spinner.control_base().has_behavior());
}
