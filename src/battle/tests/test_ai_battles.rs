#[cfg(test)]
mod tests {
    use crate::battle::ai::{BattleView, Behavior, EasyAI};
    use crate::battle::state::{ActionKind, Battle, BattleEvent, CombatantId, TurnRng};
    use crate::battle::tests::common::{assert_ok, TestCombatantBuilder};
    use crate::rosters::create_roster;
    use crate::settings::BattleSettings;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{CharacterClass, Difficulty};
    use std::cell::RefCell;
    use std::rc::Rc;

    const MAX_ACTIONS: u32 = 5_000;

    fn roster_battle(difficulty: Difficulty, seed: u64) -> Battle {
        let settings = BattleSettings::new(difficulty).with_seed(seed);
        let mut battle = Battle::from_settings(settings);
        let players = create_roster("vanguard").expect("vanguard roster");
        let enemies = create_roster("goblin_raiders").expect("goblin roster");
        if let Err(err) = battle.initialize(players, enemies) {
            panic!("Failed to initialize roster battle: {}", err);
        }
        battle
    }

    #[test]
    fn test_easy_ai_choice_distribution() {
        let players = vec![TestCombatantBuilder::new("Ilse", CharacterClass::Mage).build()];
        let enemies = vec![
            TestCombatantBuilder::new("Grub", CharacterClass::Rogue).build(),
            TestCombatantBuilder::new("Snik", CharacterClass::Rogue).build(),
        ];
        let view = BattleView::new(CombatantId::player(0), &players, &enemies, 1, 0)
            .expect("actor exists");
        let mut rng = TurnRng::seeded(42);

        let (mut attacks, mut skills, mut defends) = (0, 0, 0);
        for _ in 0..1000 {
            match EasyAI.decide_action(&view, &mut rng).kind {
                ActionKind::Attack => attacks += 1,
                ActionKind::Skill => skills += 1,
                ActionKind::Defend => defends += 1,
                ActionKind::Item => panic!("Easy AI never uses items"),
            }
        }

        // Expected 600 / 300 / 100
        assert!((520..=680).contains(&attacks), "attacks: {}", attacks);
        assert!((230..=370).contains(&skills), "skills: {}", skills);
        assert!((50..=150).contains(&defends), "defends: {}", defends);
    }

    #[rstest]
    #[case(Difficulty::Easy)]
    #[case(Difficulty::Medium)]
    #[case(Difficulty::Hard)]
    fn test_every_ai_decision_passes_validation(#[case] difficulty: Difficulty) {
        let mut battle = roster_battle(difficulty, 7);

        let mut actions = 0;
        while actions < MAX_ACTIONS {
            let Some(actor) = battle.next_actor() else {
                break;
            };
            let action = battle.decide_action(actor).expect("actor exists");
            assert_eq!(action.actor, actor);
            if let Err(err) = battle.validate_action(&action) {
                panic!("{:?} AI chose an invalid action {:?}: {}", difficulty, action, err);
            }
            assert_ok(battle.submit_action(action));
            actions += 1;
        }

        assert!(!battle
            .log()
            .events()
            .iter()
            .any(|event| matches!(event, BattleEvent::ActionFailed { .. })));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn test_easy_battle_runs_to_completion(#[case] seed: u64) {
        let mut battle = roster_battle(Difficulty::Easy, seed);

        let mut actions = 0;
        while actions < MAX_ACTIONS && battle.take_ai_turn().is_some() {
            actions += 1;
        }

        assert!(battle.status().is_over(), "no winner after {} actions", actions);
        assert_eq!(battle.take_ai_turn(), None);
        assert!(matches!(
            battle.log().events().last(),
            Some(BattleEvent::BattleEnded { .. })
                | Some(BattleEvent::ExperienceGained { .. })
                | Some(BattleEvent::LevelUp { .. })
        ));
    }

    #[test]
    fn test_same_seed_replays_the_same_battle() {
        let mut first = roster_battle(Difficulty::Medium, 99);
        let mut second = roster_battle(Difficulty::Medium, 99);

        for _ in 0..200 {
            let a = first.take_ai_turn();
            let b = second.take_ai_turn();
            assert_eq!(a, b);
            if a.is_none() {
                break;
            }
        }

        assert_eq!(
            first.log().to_json().expect("log serializes"),
            second.log().to_json().expect("log serializes")
        );
    }

    #[test]
    fn test_observer_sees_the_whole_log() {
        let mut battle = roster_battle(Difficulty::Easy, 5);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        battle.subscribe(Box::new(move |event: &BattleEvent| {
            sink.borrow_mut().push(event.clone())
        }));

        for _ in 0..50 {
            if battle.take_ai_turn().is_none() {
                break;
            }
        }

        assert_eq!(seen.borrow().as_slice(), battle.log().events());
    }

    #[test]
    fn test_reinitialize_resets_per_battle_state() {
        let mut battle = roster_battle(Difficulty::Easy, 11);
        for _ in 0..20 {
            battle.take_ai_turn();
        }
        assert!(battle.turn_number() > 0);

        let players = create_roster("ember_court").expect("ember roster");
        let enemies = create_roster("goblin_raiders").expect("goblin roster");
        battle.initialize(players, enemies).expect("valid rosters");

        assert_eq!(battle.turn_number(), 0);
        assert!(battle.log().is_empty());
        assert_eq!(battle.current_actor(), None);
        assert_eq!(battle.defend_count(schema::Side::Player), 0);
        assert!(!battle.status().is_over());
    }
}
