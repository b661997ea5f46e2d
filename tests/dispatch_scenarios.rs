use std::sync::{Arc, Mutex};

use hermes_core::{
    add_to_group, Being, BeingId, Body, Circle, Collider, CommandQueue, Error, GridOptimizer,
    Group, Handle, Interactor, Message, NaiveOptimizer, Rectangle, Result, Vec2, World,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ball_at(x: f64, y: f64, radius: f64) -> Handle<Body> {
    Handle::new(Body::new(Vec2::new(x, y), Circle::new(radius).unwrap()))
}

fn joined(group: &Group<Body>, handles: &[&Handle<Body>]) {
    for h in handles {
        add_to_group(h, group).unwrap();
    }
}

/// Counts handle calls.
struct Counter(Arc<Mutex<usize>>);

impl Collider<Body, Body> for Counter {
    fn handle(&mut self, _: &mut Body, _: &mut Body) -> Result<()> {
        *self.0.lock().unwrap() += 1;
        Ok(())
    }
}

/// Sends the first being back the way it came.
struct Bounce;

impl Collider<Body, Body> for Bounce {
    fn handle(&mut self, ball: &mut Body, _wall: &mut Body) -> Result<()> {
        ball.velocity.x = -ball.velocity.x.abs();
        Ok(())
    }
}

#[test]
fn ball_hits_wall_once_per_overlapping_frame() {
    init_logging();
    let mut world = World::new();
    let balls = Group::new();
    let walls = Group::new();

    let ball = Handle::new(
        Body::new(Vec2::ZERO, Circle::new(0.5).unwrap()).with_velocity(Vec2::new(1.0, 0.0)),
    );
    let wall = Handle::new(Body::new(
        Vec2::new(3.125, 0.0),
        Rectangle::from_half_extents(0.5, 2.0).unwrap(),
    ));
    add_to_group(&ball, &balls).unwrap();
    add_to_group(&wall, &walls).unwrap();

    let counted = Arc::new(Mutex::new(0));
    world.register_interaction(&balls, &walls, Counter(Arc::clone(&counted)), true);
    world.register_interaction(&balls, &walls, Bounce, true);

    let mut overlap_frames = 0;
    for _ in 0..20 {
        let overlapping = {
            let b = ball.lock().unwrap();
            let w = wall.lock().unwrap();
            b.body().collides_with(w.body())
        };
        let before = *counted.lock().unwrap();
        world.step(0.25).unwrap();
        let after = *counted.lock().unwrap();

        assert_eq!(after - before, usize::from(overlapping));
        if overlapping {
            overlap_frames += 1;
        }
    }

    assert_eq!(overlap_frames, 1);
    let b = ball.lock().unwrap();
    assert!(b.body().velocity.x < 0.0);
    assert!(b.body().position.x < 0.0);
}

/// Records every pair it is asked about and matches all of them. When it
/// handles the pair involving `doomed`, it queues its removal.
struct Witness {
    seen: Arc<Mutex<Vec<BeingId>>>,
    doomed: Handle<Body>,
    group: Group<Body>,
    commands: CommandQueue,
}

impl Interactor<Body, Body> for Witness {
    fn detect(&mut self, _: &Body, b: &Body) -> Result<bool> {
        self.seen.lock().unwrap().push(b.id());
        Ok(true)
    }

    fn handle(&mut self, _: &mut Body, b: &mut Body) -> Result<()> {
        if b.id() == self.doomed.id() {
            self.commands.remove(&self.doomed, &self.group)?;
        }
        Ok(())
    }
}

#[test]
fn queued_removal_takes_effect_next_frame() {
    init_logging();
    let mut world = World::new();
    let watchers = Group::new();
    let targets = Group::new();

    let watcher = ball_at(0.0, 0.0, 1.0);
    let stays = ball_at(10.0, 0.0, 1.0);
    let doomed = ball_at(20.0, 0.0, 1.0);
    joined(&watchers, &[&watcher]);
    joined(&targets, &[&stays, &doomed]);

    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));
    for seen in [&first, &second] {
        world.register_interaction(
            &watchers,
            &targets,
            Witness {
                seen: Arc::clone(seen),
                doomed: doomed.clone(),
                group: targets.clone(),
                commands: world.commands(),
            },
            true,
        );
    }

    world.step(0.1).unwrap();
    // Both registrations ran after the removal was requested and still saw it.
    assert_eq!(*first.lock().unwrap(), vec![stays.id(), doomed.id()]);
    assert_eq!(*second.lock().unwrap(), vec![stays.id(), doomed.id()]);
    assert!(!targets.contains(doomed.id()).unwrap());
    assert!(doomed.lock().unwrap().body().groups().is_empty());

    first.lock().unwrap().clear();
    world.step(0.1).unwrap();
    assert_eq!(*first.lock().unwrap(), vec![stays.id()]);
}

/// Logs matched pairs in the order they were handled.
struct PairLog(Arc<Mutex<Vec<(BeingId, BeingId)>>>);

impl Collider<Body, Body> for PairLog {
    fn handle(&mut self, a: &mut Body, b: &mut Body) -> Result<()> {
        self.0.lock().unwrap().push((a.id(), b.id()));
        Ok(())
    }
}

#[test]
fn optimizers_report_the_same_pairs_as_exhaustive_dispatch() {
    init_logging();
    let mut world = World::new();
    let movers = Group::new();
    let obstacles = Group::new();

    for i in 0..25 {
        let x = (i % 5) as f64 * 2.2;
        let y = (i / 5) as f64 * 2.2;
        let mover = Handle::new(
            Body::new(Vec2::new(x, y), Circle::new(0.9).unwrap())
                .with_velocity(Vec2::new(0.7, -0.4)),
        );
        add_to_group(&mover, &movers).unwrap();
    }
    for i in 0..15 {
        let x = (i % 5) as f64 * 2.5 + 0.6;
        let y = (i / 5) as f64 * 3.1 + 0.3;
        let obstacle = Handle::new(Body::new(
            Vec2::new(x, y),
            Rectangle::from_half_extents(0.6, 0.9).unwrap(),
        ));
        add_to_group(&obstacle, &obstacles).unwrap();
    }

    let exhaustive = Arc::new(Mutex::new(Vec::new()));
    let naive = Arc::new(Mutex::new(Vec::new()));
    let grid = Arc::new(Mutex::new(Vec::new()));
    world.register_interaction(&movers, &obstacles, PairLog(Arc::clone(&exhaustive)), true);
    world.register_optimized_interaction(
        &movers,
        &obstacles,
        PairLog(Arc::clone(&naive)),
        NaiveOptimizer,
        true,
    );
    world.register_optimized_interaction(
        &movers,
        &obstacles,
        PairLog(Arc::clone(&grid)),
        GridOptimizer::new(1.5).unwrap(),
        true,
    );

    let mut total = 0;
    for _ in 0..8 {
        world.step(0.5).unwrap();
        let expected = std::mem::take(&mut *exhaustive.lock().unwrap());
        total += expected.len();
        assert_eq!(std::mem::take(&mut *naive.lock().unwrap()), expected);
        assert_eq!(std::mem::take(&mut *grid.lock().unwrap()), expected);
    }
    assert!(total > 0);
}

#[test]
fn grid_dispatch_handles_widely_scattered_beings() {
    init_logging();
    let mut world = World::new();
    let crowd = Group::new();
    let near = ball_at(0.0, 0.0, 1.0);
    let neighbour = ball_at(0.5, 0.0, 1.0);
    let far = ball_at(1e10, 1e10, 1.0);
    joined(&crowd, &[&near, &neighbour, &far]);

    let exhaustive = Arc::new(Mutex::new(Vec::new()));
    let grid = Arc::new(Mutex::new(Vec::new()));
    world.register_interaction(&crowd, &crowd, PairLog(Arc::clone(&exhaustive)), true);
    world.register_optimized_interaction(
        &crowd,
        &crowd,
        PairLog(Arc::clone(&grid)),
        GridOptimizer::new(1.0).unwrap(),
        true,
    );

    world.step(0.1).unwrap();
    let expected = vec![(near.id(), neighbour.id()), (neighbour.id(), near.id())];
    assert_eq!(*exhaustive.lock().unwrap(), expected);
    assert_eq!(*grid.lock().unwrap(), expected);
}

/// Shoves the second being far away.
struct Shove(Arc<Mutex<usize>>);

impl Collider<Body, Body> for Shove {
    fn handle(&mut self, _: &mut Body, b: &mut Body) -> Result<()> {
        *self.0.lock().unwrap() += 1;
        b.translate(Vec2::new(100.0, 0.0));
        Ok(())
    }
}

fn shove_count(apply_immediately: bool) -> usize {
    let mut world = World::new();
    let pushers = Group::new();
    let targets = Group::new();
    let p1 = ball_at(-0.5, 0.0, 1.0);
    let p2 = ball_at(0.5, 0.0, 1.0);
    let target = ball_at(0.0, 0.0, 1.0);
    joined(&pushers, &[&p1, &p2]);
    joined(&targets, &[&target]);

    let count = Arc::new(Mutex::new(0));
    world.register_interaction(&pushers, &targets, Shove(Arc::clone(&count)), apply_immediately);
    world.step(0.0).unwrap();
    let n = *count.lock().unwrap();
    n
}

#[test]
fn deferred_handling_sees_start_of_pass_positions() {
    init_logging();
    // Immediately, the first shove moves the target out of the second pusher's reach.
    assert_eq!(shove_count(true), 1);
    // Deferred, both detections happen before either shove.
    assert_eq!(shove_count(false), 2);
}

struct Fragile {
    body: Body,
    updates: usize,
}

impl Being for Fragile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) -> Result<()> {
        self.updates += 1;
        if self.updates == 2 {
            return Err(Error::handler(format!("being {:?} broke", self.body.id())));
        }
        Ok(())
    }
}

#[test]
fn update_failure_aborts_frame_but_drains_queue() {
    init_logging();
    let mut world = World::new();
    let group = Group::new();
    let fragile = Handle::new(Fragile {
        body: Body::new(Vec2::ZERO, Circle::new(1.0).unwrap()).with_velocity(Vec2::new(1.0, 0.0)),
        updates: 0,
    });
    add_to_group(&fragile, &group).unwrap();
    world.add_group(&group);

    world.step(1.0).unwrap();
    assert_eq!(fragile.lock().unwrap().body().position.x, 1.0);

    world.delete_being(&fragile).unwrap();
    let err = world.step(1.0).unwrap_err();
    assert!(matches!(err, Error::Handler(_)));
    // Update failed before integration; the queued delete still went through.
    assert_eq!(fragile.lock().unwrap().body().position.x, 1.0);
    assert!(group.is_empty().unwrap());
    assert_eq!(world.frame_count(), 2);

    // Nothing left to update: later frames succeed.
    world.step(1.0).unwrap();
}

struct Listener {
    body: Body,
    inbox: Vec<Message>,
}

impl Being for Listener {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn receive(&mut self, message: &Message) -> Result<()> {
        self.inbox.push(message.clone());
        Ok(())
    }
}

#[test]
fn broadcast_reaches_every_member() {
    init_logging();
    let group = Group::new();
    let listeners: Vec<Handle<Listener>> = (0..3)
        .map(|i| {
            Handle::new(Listener {
                body: Body::new(Vec2::new(i as f64, 0.0), Circle::new(0.5).unwrap()),
                inbox: Vec::new(),
            })
        })
        .collect();
    for l in &listeners {
        add_to_group(l, &group).unwrap();
    }

    let message = Message::custom("/tempo", vec![120.0]);
    group.broadcast(&message).unwrap();
    for l in &listeners {
        assert_eq!(l.lock().unwrap().inbox, vec![message.clone()]);
    }
}
