//! Action service behaviour through the container
//!
//! These tests verify:
//! 1. The installer wires a working singleton service
//! 2. Pooled actions are reset and guarded against reentrant reuse
//! 3. Listener tables are pruned when listeners or instances go away
//! 4. Listeners may subscribe while a dispatch is running
//! 5. Actions can forward themselves to listeners of other action types

use parking_lot::Mutex;
use rivet_actions::{
	Action, ActionError, ActionInstaller, ActionResolver, ActionService, ActionServiceConfig,
	DispatchAs, InstanceKey, ListenerPriority, Target, listener,
};
use rivet_di::{Container, Context, Installer, Service};
use rstest::{fixture, rstest};
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[derive(Default)]
struct Score {
	points: u32,
}

impl Action for Score {
	fn reset(&mut self) {
		self.points = 0;
	}
}

struct Flag {
	applied: AtomicBool,
}

impl Action for Flag {
	fn reset(&mut self) {
		self.applied.store(false, Ordering::SeqCst);
	}

	fn apply(&self) {
		self.applied.store(true, Ordering::SeqCst);
	}
}

#[fixture]
fn installed() -> (Container, Arc<ActionService>) {
	let container = Container::new();
	ActionInstaller::new().install(&container).unwrap();
	let service = container.resolve::<ActionService>().unwrap();
	(container, service)
}

#[rstest]
fn installer_registers_an_initialized_singleton(installed: (Container, Arc<ActionService>)) {
	// Arrange
	let (container, service) = installed;

	// Act
	let again = container.resolve::<ActionService>().unwrap();

	// Assert
	assert!(Arc::ptr_eq(&service, &again));
	assert!(service.is_initialized());
	assert!(container.can_resolve::<ActionResolver>());
}

#[rstest]
fn installer_passes_its_configuration() {
	// Arrange
	let container = Container::new();
	let installer = ActionInstaller::with_config(ActionServiceConfig {
		default_priority: ListenerPriority::HIGHEST,
	});

	// Act
	installer.install(&container).unwrap();
	let service = container.resolve::<ActionService>().unwrap();
	service.subscribe_default(listener(|_: &Score| {}));

	// Assert
	assert_eq!(
		service.priorities::<Score>(&Target::Global),
		vec![ListenerPriority::HIGHEST]
	);
}

#[rstest]
fn uninstall_cleans_up_and_unbinds(installed: (Container, Arc<ActionService>)) {
	// Arrange
	let (container, service) = installed;
	service.subscribe(listener(|_: &Score| {}), ListenerPriority::LOW);

	// Act
	ActionInstaller::new().uninstall(&container).unwrap();

	// Assert
	assert!(!service.is_initialized());
	assert!(!service.has_listeners::<Score>());
	assert!(container.is_empty());
}

#[rstest]
fn pooled_dispatch_resets_before_notifying(installed: (Container, Arc<ActionService>)) {
	// Arrange
	let (_container, service) = installed;
	service.register_action(Score { points: 12 }).unwrap();
	let seen = Arc::new(AtomicU32::new(u32::MAX));
	let sink = Arc::clone(&seen);
	service.subscribe(
		listener(move |score: &Score| sink.store(score.points, Ordering::SeqCst)),
		ListenerPriority::MEDIUM,
	);

	// Act
	service.dispatch_pooled::<Score>().unwrap();

	// Assert
	assert_eq!(seen.load(Ordering::SeqCst), 0);
}

#[rstest]
fn pooled_dispatch_without_subscribers_is_a_no_op(installed: (Container, Arc<ActionService>)) {
	// Arrange
	let (_container, service) = installed;
	service.register_action(Score::default()).unwrap();

	// Act
	let result = service.dispatch_pooled::<Score>();

	// Assert
	assert!(result.is_ok());
	assert_eq!(service.action_type_count(), 0);
}

#[rstest]
fn unregistered_pooled_action_is_reported(installed: (Container, Arc<ActionService>)) {
	let (_container, service) = installed;

	let result = service.get::<Score>();

	assert!(matches!(result, Err(ActionError::Di(error)) if error.is_not_bound()));
}

#[rstest]
fn reentrant_get_reports_in_flight(installed: (Container, Arc<ActionService>)) {
	// Arrange
	let (_container, service) = installed;
	service.register_action(Score::default()).unwrap();
	let outcome = Arc::new(Mutex::new(None));
	let sink = Arc::clone(&outcome);
	let weak = Arc::downgrade(&service);
	service.subscribe(
		listener(move |_: &Score| {
			if let Some(service) = weak.upgrade() {
				*sink.lock() = Some(matches!(
					service.get::<Score>(),
					Err(ActionError::InFlight { .. })
				));
			}
		}),
		ListenerPriority::LOW,
	);

	// Act
	service.dispatch_pooled::<Score>().unwrap();

	// Assert
	assert_eq!(*outcome.lock(), Some(true));
}

#[rstest]
fn apply_runs_before_listeners() {
	// Arrange
	let service = ActionService::default();
	let observed = Arc::new(AtomicBool::new(false));
	let sink = Arc::clone(&observed);
	service.subscribe(
		listener(move |flag: &Flag| sink.store(flag.applied.load(Ordering::SeqCst), Ordering::SeqCst)),
		ListenerPriority::HIGHEST,
	);

	// Act
	service.dispatch(&Flag {
		applied: AtomicBool::new(false),
	});

	// Assert
	assert!(observed.load(Ordering::SeqCst));
}

#[rstest]
fn resubscribing_after_full_removal_shows_no_stale_buckets() {
	// Arrange
	let service = ActionService::default();
	let owner = Arc::new(());
	let key = InstanceKey::of(&owner);
	let first = listener(|_: &Score| {});
	service.subscribe_to(first.clone(), &key, ListenerPriority::LOW);
	service.subscribe_to(first.clone(), &key, ListenerPriority::HIGH);
	service.unsubscribe_from(&first, &key);

	// Act
	service.subscribe_to(listener(|_: &Score| {}), &key, ListenerPriority::MEDIUM);

	// Assert
	assert_eq!(
		service.priorities::<Score>(&Target::from(&key)),
		vec![ListenerPriority::MEDIUM]
	);
	assert_eq!(service.listener_count::<Score>(&Target::from(&key)), 1);
	assert_eq!(service.target_count::<Score>(), 1);
}

#[rstest]
fn dead_instances_are_pruned() {
	// Arrange
	let service = ActionService::default();
	let owner = Arc::new(());
	let survivor = Arc::new(());
	service.subscribe_to(listener(|_: &Score| {}), &InstanceKey::of(&owner), ListenerPriority::LOW);
	service.subscribe_to(listener(|_: &Score| {}), &InstanceKey::of(&survivor), ListenerPriority::LOW);
	drop(owner);

	// Act
	let pruned = service.prune_dead_instances();

	// Assert
	assert_eq!(pruned, 1);
	assert_eq!(service.target_count::<Score>(), 1);
}

#[rstest]
fn context_installs_the_service() {
	// Arrange
	let context = Context::new(Arc::new(ActionInstaller::new()));

	// Act
	context.install().unwrap();

	// Assert
	let service = context.container().resolve::<ActionService>().unwrap();
	assert!(service.is_initialized());
}

#[rstest]
fn service_outliving_its_container_loses_pooling() {
	// Arrange
	let container = Container::new();
	let service = ActionService::new(ActionResolver::new(&container));
	drop(container);

	// Act
	let result = service.register_action(Score::default());

	// Assert
	assert!(matches!(
		result,
		Err(ActionError::Di(rivet_di::DiError::ContainerDropped))
	));
}

/// Subscribes `label` at `priority` the first time the returned listener runs.
fn subscribing_once(
	service: &Arc<ActionService>,
	log: &Arc<Mutex<Vec<&'static str>>>,
	label: &'static str,
	priority: i32,
) -> rivet_actions::Listener<Score> {
	let weak: Weak<ActionService> = Arc::downgrade(service);
	let log = Arc::clone(log);
	let done = AtomicBool::new(false);
	listener(move |_: &Score| {
		log.lock().push("subscriber");
		if done.swap(true, Ordering::SeqCst) {
			return;
		}
		if let Some(service) = weak.upgrade() {
			let sink = Arc::clone(&log);
			service.subscribe(listener(move |_: &Score| sink.lock().push(label)), priority);
		}
	})
}

#[rstest]
fn listener_added_at_a_new_higher_priority_waits_for_the_next_dispatch() {
	// Arrange
	let service = Arc::new(ActionService::default());
	let log = Arc::new(Mutex::new(Vec::new()));
	service.subscribe(
		subscribing_once(&service, &log, "late", ListenerPriority::HIGHEST),
		ListenerPriority::MEDIUM,
	);

	// Act
	service.dispatch(&Score::default());
	let first = std::mem::take(&mut *log.lock());
	service.dispatch(&Score::default());

	// Assert
	assert_eq!(first, vec!["subscriber"]);
	assert_eq!(*log.lock(), vec!["late", "subscriber"]);
}

#[rstest]
fn listener_added_to_an_existing_lower_priority_runs_in_the_same_dispatch() {
	// Arrange
	let service = Arc::new(ActionService::default());
	let log = Arc::new(Mutex::new(Vec::new()));
	service.subscribe(
		subscribing_once(&service, &log, "late", ListenerPriority::LOW),
		ListenerPriority::HIGH,
	);
	let sink = Arc::clone(&log);
	service.subscribe(
		listener(move |_: &Score| sink.lock().push("low")),
		ListenerPriority::LOW,
	);

	// Act
	service.dispatch(&Score::default());

	// Assert
	assert_eq!(*log.lock(), vec!["subscriber", "low", "late"]);
	assert_eq!(service.listener_count::<Score>(&Target::Global), 3);
}

struct Combo {
	score: Score,
	applied: AtomicU32,
}

impl Action for Combo {
	fn reset(&mut self) {
		self.score.reset();
	}

	fn apply(&self) {
		self.applied.fetch_add(1, Ordering::SeqCst);
	}

	fn dispatch_as(&self, also: &DispatchAs<'_>) {
		also.notify(&self.score);
	}
}

#[rstest]
fn action_is_also_dispatched_as_its_embedded_action() {
	// Arrange
	let service = ActionService::default();
	let owner = Arc::new(());
	let instance = InstanceKey::of(&owner);
	let log = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&log);
	service.subscribe(
		listener(move |combo: &Combo| sink.lock().push(format!("combo {}", combo.score.points))),
		ListenerPriority::LOW,
	);
	let sink = Arc::clone(&log);
	service.subscribe(
		listener(move |score: &Score| sink.lock().push(format!("score {}", score.points))),
		ListenerPriority::HIGHEST,
	);
	let sink = Arc::clone(&log);
	service.subscribe_to(
		listener(move |score: &Score| sink.lock().push(format!("instance score {}", score.points))),
		&instance,
		ListenerPriority::MEDIUM,
	);
	let combo = Combo {
		score: Score { points: 7 },
		applied: AtomicU32::new(0),
	};

	// Act
	service.dispatch_to(&combo, &instance);

	// Assert
	assert_eq!(
		*log.lock(),
		vec!["combo 7", "score 7", "instance score 7"]
	);
	assert_eq!(combo.applied.load(Ordering::SeqCst), 1);
}

#[rstest]
fn forwarding_without_alias_listeners_is_a_no_op() {
	// Arrange
	let service = ActionService::default();
	let seen = Arc::new(AtomicU32::new(0));
	let counter = Arc::clone(&seen);
	service.subscribe(
		listener(move |_: &Combo| {
			counter.fetch_add(1, Ordering::SeqCst);
		}),
		ListenerPriority::MEDIUM,
	);

	// Act
	service.dispatch(&Combo {
		score: Score::default(),
		applied: AtomicU32::new(0),
	});

	// Assert
	assert_eq!(seen.load(Ordering::SeqCst), 1);
	assert!(!service.has_listeners::<Score>());
}
