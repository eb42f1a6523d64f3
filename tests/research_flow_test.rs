//! End-to-end flows through the public queue API.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use research_queue::{
    Eta, Force, QueueConfig, QueueObserver, QueueSnapshot, ResearchCost, ResearchState,
    ResearchQueueService, TechGraph, Technology, TraversalStrategy,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}

#[derive(Debug, Default)]
struct Events {
    changed: usize,
    active: Vec<Option<String>>,
    manual: Vec<String>,
}

#[derive(Clone, Default)]
struct SharedObserver(Rc<RefCell<Events>>);

impl QueueObserver for SharedObserver {
    fn queue_changed(&mut self) {
        self.0.borrow_mut().changed += 1;
    }

    fn active_research_changed(&mut self, key: Option<&str>) {
        self.0
            .borrow_mut()
            .active
            .push(key.map(ToString::to_string));
    }

    fn manual_action_required(&mut self, technology: &str) {
        self.0.borrow_mut().manual.push(technology.to_string());
    }
}

fn service_for(force: &Force) -> (ResearchQueueService, Rc<RefCell<Events>>) {
    let graph = Arc::new(TechGraph::build(&force.technologies).unwrap());
    let events = Rc::new(RefCell::new(Events::default()));
    let service = ResearchQueueService::new(graph, QueueConfig::default())
        .with_observer(Box::new(SharedObserver(events.clone())));
    (service, events)
}

fn order(force: &Force) -> Vec<&str> {
    force.queue.iter().map(|i| i.key.as_str()).collect()
}

#[test]
fn test_rocketry_scenario() {
    init_tracing();

    let mut force = Force::new([
        Technology::new("explosives", &[]),
        Technology::new("rocketry", &["explosives"]),
    ]);
    force.research_speed = 1.0;
    let (mut service, events) = service_for(&force);

    service.enqueue(&mut force, "rocketry", None).unwrap();
    assert_eq!(order(&force), vec!["explosives", "rocketry"]);

    assert_eq!(force.state_of("explosives"), Some(ResearchState::Available));
    assert_eq!(
        force.state_of("rocketry"),
        Some(ResearchState::ConditionallyAvailable)
    );

    // Pausing cancels active progress; unpausing re-requests it on the
    // same head without reordering anything.
    service.set_paused(&mut force, true);
    assert_eq!(force.current_research, None);
    service.set_paused(&mut force, false);
    assert_eq!(force.current_research.as_deref(), Some("explosives"));
    assert_eq!(order(&force), vec!["explosives", "rocketry"]);

    assert_eq!(
        events.borrow().active,
        vec![
            Some("explosives".to_string()),
            None,
            Some("explosives".to_string())
        ]
    );
}

#[test]
fn test_full_campaign_to_completion() {
    init_tracing();

    let mut force = Force::new([
        Technology::new("automation", &[]),
        Technology::new("electronics", &["automation"]),
        Technology::new("robotics", &["electronics"]),
    ]);
    let (mut service, events) = service_for(&force);

    service.enqueue(&mut force, "robotics", None).unwrap();
    assert_eq!(order(&force), vec!["automation", "electronics", "robotics"]);

    // The host finishes each active research in turn.
    for name in ["automation", "electronics", "robotics"] {
        assert_eq!(force.current_research.as_deref(), Some(name));
        force.technologies.get_mut(name).unwrap().researched = true;
        service.on_research_finished(&mut force, name);
    }

    assert!(force.queue.is_empty());
    assert_eq!(force.current_research, None);
    assert!(force
        .technologies
        .values()
        .all(|t| t.researched));
    assert_eq!(
        force.state_of("robotics"),
        Some(ResearchState::Completed)
    );
    // One notification per logical operation: the admit plus three
    // completions.
    assert_eq!(events.borrow().changed, 4);
}

#[test]
fn test_breadth_first_chain_matches_depth_first() {
    init_tracing();

    let techs = [
        Technology::new("a", &[]),
        Technology::new("b", &["a"]),
        Technology::new("c", &["b"]),
    ];

    let mut depth_force = Force::new(techs.clone());
    let (mut depth_service, _) = service_for(&depth_force);
    depth_service
        .enqueue(&mut depth_force, "c", None)
        .unwrap();

    let mut breadth_force = Force::new(techs);
    breadth_force.strategy = Some(TraversalStrategy::BreadthFirst);
    let (mut breadth_service, _) = service_for(&breadth_force);
    breadth_service
        .enqueue(&mut breadth_force, "c", None)
        .unwrap();

    assert_eq!(order(&depth_force), order(&breadth_force));
    assert_eq!(order(&depth_force), vec!["a", "b", "c"]);
}

#[test]
fn test_manual_trigger_promotes_past_stranded_items() {
    init_tracing();

    let mut force = Force::new([
        Technology::new("steam-power", &[]).with_cost(ResearchCost::Trigger),
        Technology::new("turbines", &["steam-power"]),
        Technology::new("optics", &[]),
    ]);
    let (mut service, events) = service_for(&force);

    service.enqueue(&mut force, "optics", None).unwrap();
    service.enqueue_front(&mut force, "turbines", None).unwrap();

    // The trigger head was reported and dropped; turbines is stranded
    // behind an unfired trigger, so optics was promoted to the front.
    assert_eq!(events.borrow().manual, vec!["steam-power"]);
    assert_eq!(order(&force), vec!["optics", "turbines"]);
    assert_eq!(force.current_research.as_deref(), Some("optics"));
}

#[test]
fn test_snapshot_survives_serialization() {
    init_tracing();

    let mut force = Force::new([
        Technology::new("explosives", &[]),
        Technology::new("rocketry", &["explosives"]),
    ]);
    let (mut service, _) = service_for(&force);
    service.enqueue(&mut force, "rocketry", None).unwrap();
    service.set_paused(&mut force, true);

    let json = service.snapshot(&force).to_json().unwrap();

    // Simulate a host reload: fresh force, same technology set.
    let mut reloaded = Force::new([
        Technology::new("explosives", &[]),
        Technology::new("rocketry", &["explosives"]),
    ]);
    let (mut service, _) = service_for(&reloaded);
    let snapshot = QueueSnapshot::from_json(&json).unwrap();
    let dropped = service.restore(&mut reloaded, &snapshot);

    assert_eq!(dropped, 0);
    assert_eq!(order(&reloaded), vec!["explosives", "rocketry"]);
    assert!(reloaded.queue.paused);
    assert_eq!(reloaded.current_research, None);
}

#[test]
fn test_estimates_follow_speed_changes() {
    init_tracing();

    let mut force = Force::new([
        Technology::new("a", &[]).with_cost(ResearchCost::Units {
            count: 10,
            time: 3.0,
        }),
        Technology::new("b", &["a"]).with_cost(ResearchCost::Units {
            count: 10,
            time: 3.0,
        }),
    ]);
    let (mut service, _) = service_for(&force);
    service.enqueue(&mut force, "b", None).unwrap();

    let etas: Vec<Eta> = force.queue.iter().map(|i| i.estimate).collect();
    assert_eq!(etas, vec![Eta::Ticks(30.0), Eta::Ticks(60.0)]);

    // A stalled force shows the sentinel, not a division by zero.
    force.research_speed = 0.0;
    service.initialize(&mut force);
    assert!(force.queue.iter().all(|i| i.estimate == Eta::Never));
}
