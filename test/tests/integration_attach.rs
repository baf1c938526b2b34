//! Integration tests for the attach test and the Held/Attached/Idle
//! transitions, observed on the owner and on a second peer

use tether_peer::{AttachMode, AttachableConfig, AttachmentEvent, Hand, Prediction};
use tether_shared::{AnchorId, ObjectId, PeerId, Placement, Pose, Vec3};
use tether_test::{assert_event, assert_no_event, assert_pose_eq, TestSession};

fn setup(config: AttachableConfig) -> (TestSession, PeerId, PeerId, ObjectId) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut session = TestSession::new();
    let owner = session.add_peer();
    let observer = session.add_peer();
    session.set_anchor(owner, AnchorId::CHEST, Pose::identity());
    session.set_anchor(
        owner,
        AnchorId::RIGHT_HAND,
        Pose::from_position(Vec3::new(0.5, 0.0, 0.0)),
    );

    let object = session.spawn_object(Pose::from_position(Vec3::new(0.0, 1.0, 0.0)), false, config);
    (session, owner, observer, object)
}

fn drop_at(session: &mut TestSession, peer: PeerId, object: ObjectId, position: Vec3) {
    session.pickup(peer, object, Hand::Right);
    session.move_object(peer, object, Pose::from_position(position));
    session.drop_object(peer, object);
}

#[test]
fn drop_exactly_at_radius_attaches() {
    let config = AttachableConfig::new(AnchorId::CHEST)
        .with_radius(0.3)
        .with_attach_mode(AttachMode::OnDrop);
    let (mut session, owner, observer, object) = setup(config);

    drop_at(&mut session, owner, object, Vec3::new(0.3, 0.0, 0.0));

    let events = session.events(owner);
    assert_event!(events, AttachmentEvent::Attached { anchor: AnchorId::CHEST, .. });
    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Attached);

    match session.placement(owner, object) {
        Placement::Attached { anchor, offset } => {
            assert_eq!(anchor, AnchorId::CHEST);
            assert!(offset.position.abs_diff_eq(Vec3::new(0.3, 0.0, 0.0), 1e-5));
        }
        other => panic!("expected attached placement, got {:?}", other),
    }
    assert!(session.body(owner, object).kinematic);

    // the observer rebuilds the same placement against the owner's rig
    assert_eq!(session.placement(observer, object), session.placement(owner, object));
    assert_pose_eq!(
        session.pose(observer, object),
        Pose::from_position(Vec3::new(0.3, 0.0, 0.0))
    );
    assert!(session.body(observer, object).kinematic);
}

#[test]
fn drop_just_outside_radius_goes_idle_and_dynamic() {
    let config = AttachableConfig::new(AnchorId::CHEST)
        .with_radius(0.3)
        .with_attach_mode(AttachMode::OnDrop);
    let (mut session, owner, observer, object) = setup(config);

    drop_at(&mut session, owner, object, Vec3::new(0.31, 0.0, 0.0));
    session.tick();

    let events = session.events(owner);
    assert_event!(events, AttachmentEvent::AttachRejected { .. });
    assert_event!(events, AttachmentEvent::Released { .. });
    assert_no_event!(events, AttachmentEvent::Attached { .. });

    let expected = Pose::from_position(Vec3::new(0.31, 0.0, 0.0));
    for peer in [owner, observer] {
        assert_eq!(session.attachable(peer, object).prediction(), Prediction::Idle);
        assert!(!session.placement(peer, object).is_attached());
        assert!(!session.body(peer, object).kinematic);
        assert_pose_eq!(session.pose(peer, object), expected);
    }
}

#[test]
fn attached_object_follows_anchor_everywhere() {
    let config = AttachableConfig::new(AnchorId::CHEST)
        .with_radius(0.3)
        .with_attach_mode(AttachMode::OnDrop);
    let (mut session, owner, observer, object) = setup(config);
    drop_at(&mut session, owner, object, Vec3::new(0.2, 0.0, 0.0));

    let sent = session.sent_count(owner);
    session.set_anchor(owner, AnchorId::CHEST, Pose::from_position(Vec3::new(1.0, 1.0, 1.0)));
    session.tick();
    session.tick();

    let expected = Pose::from_position(Vec3::new(1.2, 1.0, 1.0));
    assert_pose_eq!(session.pose(owner, object), expected);
    assert_pose_eq!(session.pose(observer, object), expected);
    assert_eq!(session.sent_count(owner), sent, "attached objects are not pushed per frame");
}

#[test]
fn held_object_pushes_every_frame() {
    let (mut session, owner, observer, object) = setup(AttachableConfig::default());

    session.pickup(owner, object, Hand::Right);
    let sent = session.sent_count(owner);
    session.move_object(owner, object, Pose::from_position(Vec3::new(0.7, 0.2, 0.0)));
    session.tick();
    session.tick();
    session.tick();

    assert_eq!(session.sent_count(owner), sent + 3);
    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Held);
    assert_pose_eq!(
        session.pose(observer, object),
        Pose::from_position(Vec3::new(0.7, 0.2, 0.0))
    );
}

#[test]
fn use_confirm_attaches_and_releases_the_grab() {
    let config = AttachableConfig::new(AnchorId::CHEST).with_radius(0.3);
    let (mut session, owner, observer, object) = setup(config);
    assert!(session.body(owner, object).auto_hold);

    session.pickup(owner, object, Hand::Right);
    session.move_object(owner, object, Pose::from_position(Vec3::new(0.0, 0.1, 0.1)));
    session.use_confirm(owner, object);

    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Attached);
    assert!(!session.body(owner, object).held);
    assert_eq!(session.placement(observer, object).anchor(), Some(AnchorId::CHEST));

    // the drop that follows the forced release changes nothing
    session.drop_object(owner, object);
    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Attached);
}

#[test]
fn plain_drop_in_use_mode_never_attaches() {
    let config = AttachableConfig::new(AnchorId::CHEST).with_radius(0.3);
    let (mut session, owner, _, object) = setup(config);

    drop_at(&mut session, owner, object, Vec3::new(0.0, 0.0, 0.1));

    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Idle);
    assert!(!session.placement(owner, object).is_attached());
}

#[test]
fn use_confirm_ignored_in_drop_mode_and_for_non_owner() {
    let config = AttachableConfig::new(AnchorId::CHEST)
        .with_radius(0.3)
        .with_attach_mode(AttachMode::OnDrop);
    let (mut session, owner, observer, object) = setup(config);

    session.pickup(owner, object, Hand::Right);
    session.move_object(owner, object, Pose::identity());
    session.use_confirm(owner, object);
    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Held);

    session.use_confirm(observer, object);
    assert_eq!(session.attachable(observer, object).prediction(), Prediction::Idle);
    assert_eq!(session.owner(object), Some(owner));
}

#[test]
fn vr_only_requires_immersive_mode() {
    let config = AttachableConfig::new(AnchorId::CHEST)
        .with_radius(0.3)
        .with_attach_mode(AttachMode::OnDrop)
        .with_vr_only(true);
    let (mut session, owner, _, object) = setup(config);

    drop_at(&mut session, owner, object, Vec3::new(0.1, 0.0, 0.0));
    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Idle);

    session.set_immersive(owner, true);
    drop_at(&mut session, owner, object, Vec3::new(0.1, 0.0, 0.0));
    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Attached);
}

#[test]
fn negative_radius_only_attaches_on_contact() {
    let config = AttachableConfig::new(AnchorId::CHEST)
        .with_radius(-1.0)
        .with_attach_mode(AttachMode::OnDrop);
    let (mut session, owner, _, object) = setup(config);
    assert_eq!(session.attachable(owner, object).config().radius, 0.0);

    drop_at(&mut session, owner, object, Vec3::new(0.01, 0.0, 0.0));
    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Idle);

    drop_at(&mut session, owner, object, Vec3::ZERO);
    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Attached);
}

#[test]
fn ignore_physics_toggle_leaves_body_dynamic() {
    let config = AttachableConfig::new(AnchorId::CHEST)
        .with_radius(0.3)
        .with_attach_mode(AttachMode::OnDrop)
        .with_ignore_physics_toggle(true);
    let (mut session, owner, observer, object) = setup(config);

    drop_at(&mut session, owner, object, Vec3::new(0.1, 0.0, 0.0));
    session.tick();

    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Attached);
    assert!(!session.body(owner, object).kinematic);
    assert!(!session.body(observer, object).kinematic);
}

#[test]
fn initially_kinematic_object_is_never_made_dynamic() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut session = TestSession::new();
    let owner = session.add_peer();
    let config = AttachableConfig::new(AnchorId::CHEST).with_attach_mode(AttachMode::OnDrop);
    let object = session.spawn_object(Pose::from_position(Vec3::new(3.0, 0.0, 0.0)), true, config);

    drop_at(&mut session, owner, object, Vec3::new(3.0, 0.0, 0.0));
    session.tick();

    assert!(!session.attachable(owner, object).was_dynamic_at_init());
    assert_eq!(session.attachable(owner, object).prediction(), Prediction::Idle);
    assert!(session.body(owner, object).kinematic);
}
