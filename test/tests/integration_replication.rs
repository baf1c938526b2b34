//! Integration tests for snapshot push and apply: the idle sync threshold,
//! the version gate across owner changes and non-owner discards

use tether_peer::{
    AttachableConfig, AttachmentEvent, DiscardReason, Hand, PeerConfig, PeerMessage, Snapshot,
};
use tether_shared::{AnchorId, ObjectId, PeerId, Placement, Pose, Vec3, Version};
use tether_test::{assert_event, assert_no_event, assert_pose_eq, TestSession};

fn setup(peers: usize) -> (TestSession, Vec<PeerId>, ObjectId) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut session = TestSession::new();
    let ids: Vec<PeerId> = (0..peers).map(|_| session.add_peer()).collect();
    let config = AttachableConfig::new(AnchorId::CHEST).with_idle_sync_epsilon(0.001);
    let object = session.spawn_object(Pose::from_position(Vec3::new(0.0, 1.0, 0.0)), false, config);
    (session, ids, object)
}

fn idle_snapshot(author: PeerId, object: ObjectId, version: u16, x: f32) -> PeerMessage {
    PeerMessage::Snapshot {
        author,
        object,
        snapshot: Snapshot::new(
            Version(version),
            Placement::Idle(Pose::from_position(Vec3::new(x, 1.0, 0.0))),
        ),
    }
}

#[test]
fn idle_moves_below_epsilon_are_not_sent() {
    let (mut session, peers, object) = setup(2);
    let (owner, observer) = (peers[0], peers[1]);
    let sent = session.sent_count(owner);

    session.move_object(owner, object, Pose::from_position(Vec3::new(0.0005, 1.0, 0.0)));
    session.tick();
    assert_eq!(session.sent_count(owner), sent);

    session.move_object(owner, object, Pose::from_position(Vec3::new(0.01, 1.0, 0.0)));
    session.tick();
    assert_eq!(session.sent_count(owner), sent + 1);
    assert_pose_eq!(
        session.pose(observer, object),
        Pose::from_position(Vec3::new(0.01, 1.0, 0.0))
    );
}

#[test]
fn falling_object_is_streamed_by_its_owner() {
    let (mut session, peers, object) = setup(2);
    let (owner, observer) = (peers[0], peers[1]);
    session.peer_mut(owner).world_mut().set_velocity(object, Vec3::new(0.0, -1.0, 0.0));

    session.tick();
    session.tick();

    let expected = session.pose(owner, object);
    assert!(expected.position.y < 1.0);
    assert_pose_eq!(session.pose(observer, object), expected);
    assert_eq!(session.sent_count(observer), 0);
}

#[test]
fn drifted_observer_snaps_back() {
    let (mut session, peers, object) = setup(2);
    let observer = peers[1];

    session.move_object(observer, object, Pose::from_position(Vec3::new(4.0, 1.0, 0.0)));
    session.tick();

    assert_pose_eq!(
        session.pose(observer, object),
        Pose::from_position(Vec3::new(0.0, 1.0, 0.0))
    );
    assert_eq!(session.sent_count(observer), 0);
}

#[test]
fn owner_ignores_inbound_snapshots() {
    let (mut session, peers, object) = setup(2);
    let (owner, observer) = (peers[0], peers[1]);

    session
        .peer_mut(owner)
        .receive_message(idle_snapshot(observer, object, 50, 9.0));

    let events = session.events(owner);
    assert_event!(
        events,
        AttachmentEvent::SnapshotDiscarded { reason: DiscardReason::LocalOwner, .. }
    );
    assert_pose_eq!(
        session.pose(owner, object),
        Pose::from_position(Vec3::new(0.0, 1.0, 0.0))
    );
}

#[test]
fn snapshot_from_non_owner_is_discarded() {
    let (mut session, peers, object) = setup(3);
    let (owner, observer, stranger) = (peers[0], peers[1], peers[2]);

    session
        .peer_mut(observer)
        .receive_message(idle_snapshot(stranger, object, 7, 9.0));

    assert_eq!(owner, PeerId(1));
    let events = session.events(observer);
    assert_event!(
        events,
        AttachmentEvent::SnapshotDiscarded {
            reason: DiscardReason::NotOwner { owner: Some(PeerId(1)) },
            ..
        }
    );
    assert!(session.attachable(observer, object).last_applied().is_none());
}

#[test]
fn stale_or_repeated_versions_are_discarded() {
    let (mut session, peers, object) = setup(2);
    let (owner, observer) = (peers[0], peers[1]);

    session.peer_mut(observer).receive_message(idle_snapshot(owner, object, 10, 2.0));
    session.peer_mut(observer).receive_message(idle_snapshot(owner, object, 10, 3.0));
    session.peer_mut(observer).receive_message(idle_snapshot(owner, object, 9, 4.0));

    let events = session.events(observer);
    let discarded = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                AttachmentEvent::SnapshotDiscarded {
                    reason: DiscardReason::Stale { applied: Version(10) },
                    ..
                }
            )
        })
        .count();
    assert_eq!(discarded, 2);
    assert_pose_eq!(
        session.pose(observer, object),
        Pose::from_position(Vec3::new(2.0, 1.0, 0.0))
    );
}

#[test]
fn version_gate_survives_wrap_around() {
    let (mut session, peers, object) = setup(2);
    let (owner, observer) = (peers[0], peers[1]);

    for (version, x) in [(u16::MAX - 1, 1.0), (u16::MAX, 2.0), (0, 3.0), (1, 4.0)] {
        session
            .peer_mut(observer)
            .receive_message(idle_snapshot(owner, object, version, x));
    }
    assert_no_event!(
        session.events(observer),
        AttachmentEvent::SnapshotDiscarded { .. }
    );

    session
        .peer_mut(observer)
        .receive_message(idle_snapshot(owner, object, 65000, 5.0));
    assert_event!(
        session.events(observer),
        AttachmentEvent::SnapshotDiscarded { reason: DiscardReason::Stale { .. }, .. }
    );
    assert_eq!(
        session.attachable(observer, object).last_applied(),
        Some((owner, Version(1)))
    );
}

#[test]
fn late_snapshot_from_returning_owner_is_discarded() {
    let (mut session, peers, object) = setup(3);
    let (first, second, observer) = (peers[0], peers[1], peers[2]);

    session
        .peer_mut(observer)
        .receive_message(idle_snapshot(first, object, 10, 10.0));
    session.shared().borrow_mut().force_owner(object, second);
    session
        .peer_mut(observer)
        .receive_message(idle_snapshot(second, object, 11, 11.0));

    // ownership returns, then a packet from the first turn arrives late
    session.shared().borrow_mut().force_owner(object, first);
    session
        .peer_mut(observer)
        .receive_message(idle_snapshot(first, object, 9, 9.0));

    assert_event!(
        session.events(observer),
        AttachmentEvent::SnapshotDiscarded {
            reason: DiscardReason::Stale { applied: Version(11) },
            ..
        }
    );
    assert_pose_eq!(
        session.pose(observer, object),
        Pose::from_position(Vec3::new(11.0, 1.0, 0.0))
    );
    assert_eq!(
        session.attachable(observer, object).last_applied(),
        Some((second, Version(11)))
    );
}

#[test]
fn previous_owner_discards_versions_it_already_sent() {
    let (mut session, peers, object) = setup(2);
    let (owner, observer) = (peers[0], peers[1]);
    session.pickup(owner, object, Hand::Right);
    let sent = session.attachable(owner, object).last_sent().unwrap().version;

    session.shared().borrow_mut().force_owner(object, observer);
    session
        .peer_mut(owner)
        .receive_message(idle_snapshot(observer, object, sent.0, 7.0));

    assert_event!(
        session.events(owner),
        AttachmentEvent::SnapshotDiscarded { reason: DiscardReason::Stale { .. }, .. }
    );
}

#[test]
fn new_owner_continues_version_sequence() {
    let (mut session, peers, object) = setup(2);
    let (owner, observer) = (peers[0], peers[1]);
    session.pickup(owner, object, Hand::Right);
    session.tick();
    let seen = session
        .attachable(observer, object)
        .last_applied()
        .map(|(_, version)| version)
        .unwrap();

    session.pickup(observer, object, Hand::Left);

    let sent = session.attachable(observer, object).last_sent().unwrap().version;
    assert!(sent.is_newer_than(seen));
    assert_eq!(
        session.attachable(owner, object).last_applied(),
        Some((observer, sent))
    );
}

#[test]
fn kinematic_flag_is_optional_on_the_wire() {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = PeerConfig {
        replicate_physics_mode: false,
        ..PeerConfig::default()
    };
    let mut session = TestSession::with_config(config);
    let owner = session.add_peer();
    let observer = session.add_peer();
    let object = session.spawn_object(Pose::identity(), false, AttachableConfig::default());

    session.pickup(owner, object, Hand::Right);

    assert_eq!(session.attachable(owner, object).last_sent().unwrap().kinematic, None);
    assert_eq!(session.attachable(observer, object).owner_kinematic(), None);
    // receivers still derive the physics mode from the placement
    assert!(session.body(observer, object).kinematic);
}

#[test]
fn unknown_object_is_ignored() {
    let (mut session, peers, _) = setup(2);
    let (owner, observer) = (peers[0], peers[1]);

    let payload = idle_snapshot(owner, ObjectId(404), 1, 0.0).to_bytes();
    assert!(session.peer_mut(observer).receive(&payload).is_ok());
    assert!(session.events(observer).is_empty());
}

#[test]
fn garbage_payload_is_an_error() {
    let (mut session, peers, _) = setup(2);

    assert!(session.peer_mut(peers[1]).receive(&[0x00]).is_err());
}
