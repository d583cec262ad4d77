use microbe_world::{SimulationConfig, SnapshotFeed, SnapshotQueryResult, WorldKernel};

#[test]
fn default_world_runs_and_keeps_its_invariants() {
    let config = SimulationConfig::default().validate().expect("valid config");
    let mut kernel = WorldKernel::new(config.clone());

    for tick in 1..=50u64 {
        kernel.tick();
        assert_eq!(kernel.stats().age, tick);
        assert_eq!(kernel.revision(), tick);

        let mut agents = 0u64;
        for cell in &kernel.model().cells {
            for (resource, &stock) in cell.resources.iter().enumerate() {
                assert!(
                    (0..=config.stack_size(resource)).contains(&stock),
                    "cell stock out of bounds at tick {tick}"
                );
            }
            if let Some(agent) = &cell.agent {
                assert!(agent.alive);
                assert!(agent.x < config.x_max && agent.y < config.y_max);
                assert_eq!(agent.code.len(), config.code_size);
                assert_eq!(agent.registers.len(), config.regs_size);
                for (resource, &amount) in agent.resources.iter().enumerate() {
                    assert!((0..=config.stack_size(resource)).contains(&amount));
                }
                agents += 1;
            }
        }
        assert_eq!(agents, kernel.stats().count);
    }

    // The default spawn floor keeps the world populated.
    assert!(kernel.live_count() > 0);
}

#[test]
fn snapshot_feed_reports_changes_at_tick_boundaries() {
    let config = SimulationConfig::default().validate().expect("valid config");
    let mut kernel = WorldKernel::new(config);
    let mut feed = SnapshotFeed::default();

    kernel.tick();
    feed.refresh(&kernel).expect("refresh feed");

    // A reader with no prior state gets the full world.
    let first = feed.get_snapshot(None);
    let revision = match &first {
        SnapshotQueryResult::Full { revision, world } => {
            assert!(!world.is_empty());
            *revision
        }
        SnapshotQueryResult::Unchanged => panic!("first query must return a full snapshot"),
    };
    assert_eq!(revision, 1);

    // Re-polling with the current revision yields no payload.
    assert_eq!(
        feed.get_snapshot(Some(revision)),
        SnapshotQueryResult::Unchanged
    );

    // Mid-tick state is invisible: the feed only changes on refresh.
    kernel.tick();
    assert_eq!(
        feed.get_snapshot(Some(revision)),
        SnapshotQueryResult::Unchanged
    );

    feed.refresh(&kernel).expect("refresh feed");
    match feed.get_snapshot(Some(revision)) {
        SnapshotQueryResult::Full { revision: next, .. } => assert_eq!(next, 2),
        SnapshotQueryResult::Unchanged => panic!("stale reader must get the new snapshot"),
    }

    // A reader holding an unknown revision also gets the full world.
    assert!(matches!(
        feed.get_snapshot(Some(999)),
        SnapshotQueryResult::Full { .. }
    ));
}
