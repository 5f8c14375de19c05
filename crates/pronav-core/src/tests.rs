#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::commands::PlayerCommand;
    use crate::components::{Explosion, RigidBody};
    use crate::enums::*;
    use crate::events::SimEvent;
    use crate::state::SimSnapshot;
    use crate::types::{SimTime, Vec2, WorldSize};

    #[test]
    fn test_guidance_kind_cycles_through_all() {
        let mut kind = GuidanceKind::SimplePN;
        let mut seen = Vec::new();
        for _ in 0..GuidanceKind::ALL.len() {
            seen.push(kind);
            kind = kind.next();
        }
        assert_eq!(kind, GuidanceKind::SimplePN);
        assert_eq!(seen, GuidanceKind::ALL.to_vec());
    }

    #[test]
    fn test_guidance_kind_serde() {
        for v in GuidanceKind::ALL {
            let json = serde_json::to_string(&v).unwrap();
            let back: GuidanceKind = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_command_tagged_json() {
        let json = r#"{"type":"FireMissile","guidance":"QuadraticPN"}"#;
        let cmd: PlayerCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            PlayerCommand::FireMissile {
                target_id: None,
                guidance: Some(GuidanceKind::QuadraticPN),
                kind: None,
            }
        );

        let json = r#"{"type":"SpawnTarget","position":[100.0,250.0],"profile":"Erratic"}"#;
        let cmd: PlayerCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            PlayerCommand::SpawnTarget {
                position: Some(Vec2::new(100.0, 250.0)),
                profile: Some(TargetProfile::Erratic),
            }
        );

        let cmd: PlayerCommand = serde_json::from_str(r#"{"type":"Step"}"#).unwrap();
        assert_eq!(cmd, PlayerCommand::Step);
    }

    #[test]
    fn test_event_serialization() {
        let event = SimEvent::MissileExpired {
            id: 7,
            reason: ExpiryReason::TargetLost,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"MissileExpired\""));
        assert!(json.contains("TargetLost"));
    }

    #[test]
    fn test_default_snapshot_serializes() {
        let snapshot = SimSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SimSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        time.advance(0.06);
        time.advance(0.06);
        assert_eq!(time.frame, 2);
        assert_abs_diff_eq!(time.elapsed_secs, 0.12, epsilon = 1e-12);
    }

    #[test]
    fn test_world_wrap_and_padding() {
        let size = WorldSize::new(1000.0, 500.0);
        assert_eq!(size.wrap(Vec2::new(-1.0, 250.0)), Vec2::new(1000.0, 250.0));
        assert_eq!(size.wrap(Vec2::new(500.0, 501.0)), Vec2::new(500.0, 0.0));
        assert!(size.contains_padded(Vec2::new(-1999.0, 0.0), 2000.0));
        assert!(!size.contains_padded(Vec2::new(3001.0, 0.0), 2000.0));
    }

    #[test]
    fn test_rigid_body_integrate_wraps_rotation() {
        let mut body = RigidBody::new(Vec2::ZERO, Vec2::new(10.0, -5.0), 350.0)
            .with_rotation_speed(40.0);
        body.integrate(0.5);
        assert_eq!(body.position, Vec2::new(5.0, -2.5));
        assert_abs_diff_eq!(body.rotation, 10.0, epsilon = 1e-9);

        body.rotation_speed = -100.0;
        body.integrate(0.5);
        assert_abs_diff_eq!(body.rotation, 320.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rigid_body_world_polygon_and_contains() {
        let square = vec![
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-10.0, 10.0),
        ];
        let body = RigidBody::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 45.0).with_polygon(square);
        let center = body.center();
        assert_abs_diff_eq!(center.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(center.y, 100.0, epsilon = 1e-9);

        // Rotated 45 degrees the corners reach ~14.1 along the axes.
        assert!(body.contains_point(Vec2::new(113.0, 100.0)));
        assert!(!body.contains_point(Vec2::new(109.0, 109.0)));

        let bullet = RigidBody::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 0.0);
        assert!(bullet.is_point());
        assert!(!bullet.contains_point(Vec2::new(100.0, 100.0)));
        assert_eq!(bullet.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_explosion_grows_then_expires() {
        let mut explosion = Explosion::new(200.0, 1.0);
        let center = Vec2::ZERO;
        assert!(!explosion.advance(0.5));
        assert_eq!(explosion.radius, 0.0);
        assert!(!explosion.covers(center, Vec2::ZERO));

        assert!(explosion.advance(0.5));
        assert_abs_diff_eq!(explosion.radius, 100.0, epsilon = 1e-9);
        assert!(explosion.covers(center, Vec2::new(99.0, 0.0)));
        assert!(!explosion.covers(center, Vec2::new(101.0, 0.0)));
    }
}
