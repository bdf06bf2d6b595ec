//! Tests for the stalker decision core.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::super::config::{ConfigError, StalkerConfig};
    use super::super::controller::*;
    use super::super::orientation::yaw_towards;
    use super::super::placement::{CollisionSwitch, GroundProbe, ProbeQuery};

    /// Плоская земля на высоте `height` везде
    struct FlatProbe {
        height: f32,
    }

    impl GroundProbe for FlatProbe {
        fn probe(&self, query: &ProbeQuery) -> Option<Vec3> {
            Some(Vec3::new(query.origin.x, self.height, query.origin.z))
        }
    }

    struct MissProbe;

    impl GroundProbe for MissProbe {
        fn probe(&self, _query: &ProbeQuery) -> Option<Vec3> {
            None
        }
    }

    struct Collider {
        enabled: bool,
        history: Vec<bool>,
        settles: usize,
    }

    impl Default for Collider {
        fn default() -> Self {
            Self { enabled: true, history: Vec::new(), settles: 0 }
        }
    }

    impl CollisionSwitch for Collider {
        fn collision_enabled(&self) -> bool {
            self.enabled
        }

        fn set_collision_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
            self.history.push(enabled);
        }

        fn settle(&mut self) {
            self.settles += 1;
        }
    }

    #[derive(Default)]
    struct Cues(Vec<Relocation>);

    impl CueSink for Cues {
        fn play_one_shot(&mut self, cue: &Relocation) {
            self.0.push(*cue);
        }
    }

    #[derive(Default)]
    struct Effect(Vec<bool>);

    impl EffectSwitch for Effect {
        fn set_active(&mut self, active: bool) {
            self.0.push(active);
        }
    }

    struct Harness<P: GroundProbe> {
        probe: P,
        collider: Collider,
        cues: Cues,
        effect: Effect,
        rng: ChaCha8Rng,
    }

    impl<P: GroundProbe> Harness<P> {
        fn new(probe: P) -> Self {
            Self {
                probe,
                collider: Collider::default(),
                cues: Cues::default(),
                effect: Effect::default(),
                rng: ChaCha8Rng::seed_from_u64(42),
            }
        }

        fn tick(&mut self, stalker: &mut StalkerController, delta: f32, target: Vec3) -> TickReport {
            let mut io = StalkerIo {
                probe: &self.probe,
                collision: &mut self.collider,
                audio: &mut self.cues,
                effect: &mut self.effect,
            };
            stalker.tick(delta, target, &mut self.rng, &mut io)
        }
    }

    fn spawn(config: StalkerConfig, position: Vec3, effect: &mut Effect) -> StalkerController {
        let mut stalker = StalkerController::new(config, position, Quat::IDENTITY).unwrap();
        stalker.initialize(effect);
        stalker
    }

    fn far_target() -> Vec3 {
        Vec3::new(100.0, 0.0, 100.0)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = StalkerConfig { chase_probability: -0.1, ..Default::default() };
        let result = StalkerController::new(config, Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(result.unwrap_err(), ConfigError::ChanceOutOfRange(-0.1));
    }

    #[test]
    fn test_dormant_tick_is_noop() {
        let mut harness = Harness::new(FlatProbe { height: 0.0 });
        let mut stalker = StalkerController::new(StalkerConfig::default(), Vec3::ZERO, Quat::IDENTITY).unwrap();

        let report = harness.tick(&mut stalker, 100.0, Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(report, TickReport::default());
        assert_eq!(stalker.phase(), StalkerPhase::Dormant);
        assert_eq!(stalker.timer(), 5.0);
        assert!(harness.cues.0.is_empty());
    }

    #[test]
    fn test_initialize_captures_home_and_hides_effect() {
        let mut effect = Effect::default();
        let start = Vec3::new(3.0, 1.0, -7.0);
        let stalker = spawn(StalkerConfig::default(), start, &mut effect);

        assert_eq!(stalker.home(), start);
        assert_eq!(stalker.timer(), 5.0);
        assert_eq!(stalker.phase(), StalkerPhase::Idle);
        assert_eq!(effect.0, vec![false]);
    }

    #[test]
    fn test_decision_fires_when_timer_reaches_zero() {
        let config = StalkerConfig { chase_probability: 1.0, ..Default::default() };
        let mut harness = Harness::new(FlatProbe { height: 0.0 });
        let mut stalker = spawn(config, Vec3::ZERO, &mut harness.effect);

        // 0.5 точно представимо → после 10 тиков таймер ровно 0
        for _ in 0..9 {
            assert!(harness.tick(&mut stalker, 0.5, far_target()).relocation.is_none());
        }
        let report = harness.tick(&mut stalker, 0.5, far_target());

        assert_eq!(report.relocation.map(|r| r.action), Some(TeleportAction::Approach));
        assert_eq!(stalker.timer(), 5.0);
        assert_eq!(stalker.phase(), StalkerPhase::Idle);
        assert_eq!(harness.cues.0.len(), 1);
    }

    #[test]
    fn test_always_approach_with_probability_one() {
        let config = StalkerConfig { chase_probability: 1.0, ..Default::default() };
        let mut harness = Harness::new(FlatProbe { height: 2.5 });
        let mut stalker = spawn(config.clone(), Vec3::ZERO, &mut harness.effect);
        let target = Vec3::new(20.0, 2.5, -4.0);

        for _ in 0..50 {
            let report = harness.tick(&mut stalker, 5.0, target);
            let relocation = report.relocation.expect("decision every cooldown");
            assert_eq!(relocation.action, TeleportAction::Approach);

            let planar = Vec2::new(relocation.to.x - target.x, relocation.to.z - target.z).length();
            assert!((planar - config.teleport_distance).abs() < 1e-3, "planar = {}", planar);
            assert_eq!(relocation.to.y, 2.5 + config.foot_offset() + config.clearance);
        }
        assert_eq!(stalker.last_action(), Some(TeleportAction::Approach));
    }

    #[test]
    fn test_always_return_with_probability_zero() {
        let config = StalkerConfig { chase_probability: 0.0, ..Default::default() };
        let mut harness = Harness::new(FlatProbe { height: -1.0 });
        let home = Vec3::new(7.0, 30.0, 7.0);
        let mut stalker = spawn(config.clone(), home, &mut harness.effect);

        for _ in 0..50 {
            let report = harness.tick(&mut stalker, 10.0, far_target());
            let relocation = report.relocation.expect("decision every cooldown");
            assert_eq!(relocation.action, TeleportAction::Return);
            assert_eq!(
                relocation.to,
                Vec3::new(7.0, -1.0 + config.foot_offset() + config.clearance, 7.0)
            );
            assert_eq!(stalker.timer(), config.return_cooldown);
        }
        // Дом фиксируется при initialize и не сдвигается после snap
        assert_eq!(stalker.home(), home);
    }

    #[test]
    fn test_probe_miss_keeps_commanded_height() {
        let config = StalkerConfig { chase_probability: 0.0, ..Default::default() };
        let mut harness = Harness::new(MissProbe);
        let home = Vec3::new(1.0, 4.0, 2.0);
        let mut stalker = spawn(config.clone(), home, &mut harness.effect);

        let relocation = harness.tick(&mut stalker, 10.0, far_target()).relocation.unwrap();

        assert_eq!(relocation.to.y, 4.0 + config.foot_offset() + config.clearance);
        assert_eq!(stalker.position(), relocation.to);
    }

    #[test]
    fn test_collision_suspended_only_during_relocation() {
        let config = StalkerConfig { chase_probability: 0.0, ..Default::default() };
        let mut harness = Harness::new(MissProbe);
        let mut stalker = spawn(config, Vec3::ZERO, &mut harness.effect);

        harness.tick(&mut stalker, 1.0, far_target());
        assert!(harness.collider.history.is_empty());

        harness.tick(&mut stalker, 20.0, far_target());
        assert_eq!(harness.collider.history, vec![false, true]);
        assert_eq!(harness.collider.settles, 1);
        assert!(harness.collider.enabled);
    }

    #[test]
    fn test_proximity_scenario_target_closing_in() {
        let config = StalkerConfig { approach_cooldown: 1000.0, ..Default::default() };
        let mut harness = Harness::new(FlatProbe { height: 0.0 });
        let mut stalker = spawn(config, Vec3::ZERO, &mut harness.effect);

        let mut toggled_at = None;
        for tick in 0..6 {
            let target = Vec3::new(6.0 - tick as f32, 0.0, 0.0);
            if let Some(active) = harness.tick(&mut stalker, 0.1, target).effect_changed {
                assert!(active);
                assert!(toggled_at.is_none(), "effect toggled twice");
                toggled_at = Some(tick);
            }
        }

        // tick 1: distance 5.0 → первый раз ≤ радиуса
        assert_eq!(toggled_at, Some(1));
        assert_eq!(harness.effect.0, vec![false, true]);
        assert!(stalker.effect_active());
    }

    #[test]
    fn test_proximity_oscillation_never_toggles() {
        let config = StalkerConfig { approach_cooldown: 1000.0, ..Default::default() };
        let mut harness = Harness::new(FlatProbe { height: 0.0 });
        let mut stalker = spawn(config, Vec3::ZERO, &mut harness.effect);

        harness.tick(&mut stalker, 0.1, Vec3::new(4.9, 0.0, 0.0));
        for i in 0..200 {
            let x = if i % 2 == 0 { 4.95 } else { 4.9 };
            let report = harness.tick(&mut stalker, 0.1, Vec3::new(x, 0.0, 0.0));
            assert_eq!(report.effect_changed, None);
        }
        assert_eq!(harness.effect.0, vec![false, true]);

        let report = harness.tick(&mut stalker, 0.1, Vec3::new(5.5, 0.0, 0.0));
        assert_eq!(report.effect_changed, Some(false));
    }

    /// Ошибка yaw (радианы, [0, π]) между forward и направлением на цель
    fn yaw_error(rotation: Quat, from: Vec3, to: Vec3) -> f32 {
        let forward = rotation * Vec3::NEG_Z;
        let current = f32::atan2(-forward.x, -forward.z);
        let goal = f32::atan2(-(to.x - from.x), -(to.z - from.z));
        let diff = (current - goal).rem_euclid(std::f32::consts::TAU);
        diff.min(std::f32::consts::TAU - diff)
    }

    #[test]
    fn test_yaw_converges_monotonically() {
        let config = StalkerConfig { approach_cooldown: 1000.0, ..Default::default() };
        let mut harness = Harness::new(FlatProbe { height: 0.0 });
        let mut stalker = spawn(config, Vec3::ZERO, &mut harness.effect);
        let target = Vec3::new(-30.0, 0.0, 10.0);

        let mut previous = yaw_error(stalker.rotation(), Vec3::ZERO, target);
        for _ in 0..240 {
            harness.tick(&mut stalker, 1.0 / 60.0, target);
            let error = yaw_error(stalker.rotation(), Vec3::ZERO, target);
            assert!(error <= previous + 1e-5, "yaw error grew: {} → {}", previous, error);
            previous = error;
        }
        assert!(previous < 0.01, "not converged: {}", previous);
    }

    #[test]
    fn test_faces_target_right_after_relocation() {
        let config = StalkerConfig { chase_probability: 1.0, ..Default::default() };
        let mut harness = Harness::new(FlatProbe { height: 0.0 });
        let mut stalker = spawn(config, Vec3::ZERO, &mut harness.effect);
        let target = Vec3::new(0.0, 0.0, 50.0);

        let relocation = harness.tick(&mut stalker, 5.0, target).relocation.unwrap();

        assert_eq!(Some(stalker.rotation()), yaw_towards(relocation.to, target));
    }

    #[test]
    fn test_shutdown_hides_effect_and_stops() {
        let mut harness = Harness::new(FlatProbe { height: 0.0 });
        let mut stalker = spawn(StalkerConfig::default(), Vec3::ZERO, &mut harness.effect);

        harness.tick(&mut stalker, 0.1, Vec3::new(1.0, 0.0, 0.0));
        assert!(stalker.effect_active());

        stalker.shutdown(&mut harness.effect);
        assert_eq!(harness.effect.0, vec![false, true, false]);
        assert_eq!(stalker.phase(), StalkerPhase::Dormant);

        let report = harness.tick(&mut stalker, 100.0, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(report, TickReport::default());
    }

    #[test]
    fn test_reenable_keeps_home() {
        let config = StalkerConfig { chase_probability: 1.0, ..Default::default() };
        let home = Vec3::new(-30.0, 0.0, -30.0);
        let mut harness = Harness::new(FlatProbe { height: 0.0 });
        let mut stalker = spawn(config, home, &mut harness.effect);

        let relocation = harness.tick(&mut stalker, 5.0, Vec3::ZERO).relocation.unwrap();
        assert_ne!(relocation.to, home);

        stalker.shutdown(&mut harness.effect);
        stalker.initialize(&mut harness.effect);

        assert_eq!(stalker.home(), home, "home moved after Disable/Enable");
        assert_eq!(stalker.position(), relocation.to);
        assert_eq!(stalker.timer(), 5.0);
        assert_eq!(stalker.phase(), StalkerPhase::Idle);
        // Эффект не включался → повторный старт его не трогает
        assert_eq!(harness.effect.0, vec![false]);
    }

    #[test]
    fn test_reinitialize_hides_only_active_effect() {
        let mut harness = Harness::new(FlatProbe { height: 0.0 });
        let mut stalker = spawn(StalkerConfig::default(), Vec3::ZERO, &mut harness.effect);

        stalker.initialize(&mut harness.effect);
        assert_eq!(harness.effect.0, vec![false]);

        harness.tick(&mut stalker, 0.1, Vec3::new(1.0, 0.0, 0.0));
        stalker.initialize(&mut harness.effect);

        assert_eq!(harness.effect.0, vec![false, true, false]);
        assert!(!stalker.effect_active());
    }

    #[test]
    fn test_choice_frequency_matches_probability() {
        let stalker = StalkerController::new(StalkerConfig::default(), Vec3::ZERO, Quat::IDENTITY).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);

        let approaches = (0..1000)
            .filter(|_| stalker.choose_action(rng.gen::<f32>()) == TeleportAction::Approach)
            .count();

        let fraction = approaches as f32 / 1000.0;
        assert!((fraction - 0.65).abs() < 0.05, "fraction = {}", fraction);
    }

    proptest! {
        #[test]
        fn prop_one_decision_per_cooldown(deltas in prop::collection::vec(0.0f32..0.5, 1..400)) {
            let config = StalkerConfig { chase_probability: 1.0, approach_cooldown: 2.0, ..Default::default() };
            let mut harness = Harness::new(FlatProbe { height: 0.0 });
            let mut stalker = spawn(config, Vec3::ZERO, &mut harness.effect);

            let mut decisions = 0u32;
            let mut total = 0.0f64;
            for delta in deltas {
                total += delta as f64;
                if harness.tick(&mut stalker, delta, far_target()).relocation.is_some() {
                    decisions += 1;
                }
                prop_assert!(stalker.timer() > 0.0 && stalker.timer() <= 2.0);
            }

            prop_assert!(decisions as f64 <= total / 2.0 + 1e-3);
            prop_assert!(decisions as f64 >= (total / 2.5).floor() - 1.0);
        }
    }
}
