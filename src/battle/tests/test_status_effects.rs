#[cfg(test)]
mod tests {
    use crate::battle::state::{Action, BattleEvent, BattleStatus, CombatantId};
    use crate::battle::tests::common::{create_test_battle, expect_next_actor, TestCombatantBuilder};
    use crate::skills::SkillId;
    use pretty_assertions::assert_eq;
    use schema::{CharacterClass, Element, StatusKind};

    fn status_damage(events: &[BattleEvent]) -> Vec<(StatusKind, u32, u32)> {
        events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::StatusDamage {
                    status,
                    damage,
                    remaining_hp,
                    ..
                } => Some((*status, *damage, *remaining_hp)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_poison_ticks_three_times_then_lapses_quietly() {
        let players = vec![TestCombatantBuilder::new("Aldric", CharacterClass::Warrior).build()];
        let enemies = vec![TestCombatantBuilder::new("Borin", CharacterClass::Warrior)
            .with_status(StatusKind::Poison)
            .build()];
        let mut battle = create_test_battle(players, enemies);

        for _ in 0..8 {
            let actor = expect_next_actor(&mut battle);
            battle.execute_action(Action::defend(actor));
        }

        let events = battle.log().events();
        assert_eq!(
            status_damage(events),
            vec![
                (StatusKind::Poison, 6, 114),
                (StatusKind::Poison, 6, 108),
                (StatusKind::Poison, 6, 102),
            ]
        );
        assert!(!events
            .iter()
            .any(|event| matches!(event, BattleEvent::StatusExpired { .. })));
        assert!(!battle.enemies()[0].has_status(StatusKind::Poison));
        assert_eq!(battle.enemies()[0].current_hp(), 102);
        assert_eq!(battle.players()[0].current_hp(), 120);
    }

    #[test]
    fn test_hex_poisons_the_target() {
        let players = vec![TestCombatantBuilder::new("Ilse", CharacterClass::Mage).build()];
        let enemies = vec![TestCombatantBuilder::new("Borin", CharacterClass::Warrior).build()];
        let mut battle = create_test_battle(players, enemies);

        let ilse = expect_next_actor(&mut battle);
        battle.execute_action(Action::skill(ilse, SkillId::Hex, CombatantId::enemy(0)));

        assert!(battle.log().events().contains(&BattleEvent::StatusApplied {
            target: "Borin".to_string(),
            status: StatusKind::Poison,
        }));
        assert_eq!(battle.enemies()[0].effects.remaining(StatusKind::Poison), Some(3));
        assert_eq!(battle.players()[0].current_mp(), 70);
    }

    #[test]
    fn test_reapplying_refreshes_duration_instead_of_stacking() {
        let players = vec![TestCombatantBuilder::new("Ilse", CharacterClass::Mage).build()];
        let enemies = vec![TestCombatantBuilder::new("Borin", CharacterClass::Warrior)
            .with_status(StatusKind::Poison)
            .build()];
        let mut battle = create_test_battle(players, enemies);

        let ilse = expect_next_actor(&mut battle);
        battle.execute_action(Action::defend(ilse));
        let borin = expect_next_actor(&mut battle);
        battle.execute_action(Action::defend(borin));
        assert_eq!(battle.enemies()[0].effects.remaining(StatusKind::Poison), Some(2));

        let ilse = expect_next_actor(&mut battle);
        battle.execute_action(Action::skill(ilse, SkillId::Hex, CombatantId::enemy(0)));

        assert_eq!(battle.enemies()[0].effects.remaining(StatusKind::Poison), Some(3));
        assert_eq!(battle.enemies()[0].effects.len(), 1);
    }

    #[test]
    fn test_dazzle_stuns_the_target_for_its_next_turn() {
        let players = vec![TestCombatantBuilder::new("Mira", CharacterClass::Cleric)
            .with_element(Element::Water)
            .build()];
        let enemies = vec![TestCombatantBuilder::new("Borin", CharacterClass::Warrior).build()];
        let mut battle = create_test_battle(players, enemies);

        let mira = expect_next_actor(&mut battle);
        battle.execute_action(Action::skill(mira, SkillId::Dazzle, CombatantId::enemy(0)));
        assert!(battle.enemies()[0].is_stunned());

        // Borin loses his round-one turn and Mira opens round two
        assert_eq!(expect_next_actor(&mut battle), mira);
        assert_eq!(battle.turn_number(), 2);
        assert!(battle.log().events().contains(&BattleEvent::TurnSkipped {
            actor: CombatantId::enemy(0),
            name: "Borin".to_string(),
        }));

        battle.execute_action(Action::defend(mira));
        assert_eq!(expect_next_actor(&mut battle), CombatantId::enemy(0));
    }

    #[test]
    fn test_lethal_burn_tick_defeats_and_ends_the_battle() {
        let players = vec![TestCombatantBuilder::new("Aldric", CharacterClass::Warrior).build()];
        let enemies = vec![TestCombatantBuilder::new("Grub", CharacterClass::Rogue)
            .with_element(Element::Earth)
            .with_hp(5)
            .with_status(StatusKind::Burn)
            .with_status(StatusKind::Shielded)
            .build()];
        let mut battle = create_test_battle(players, enemies);

        let grub = expect_next_actor(&mut battle);
        battle.execute_action(Action::defend(grub));

        let events = battle.log().events();
        battle.log().print_debug_with_message("Events for test_lethal_burn_tick_defeats_and_ends_the_battle:");
        assert_eq!(status_damage(events), vec![(StatusKind::Burn, 5, 0)]);
        assert!(events.contains(&BattleEvent::CombatantDefeated {
            id: CombatantId::enemy(0),
            name: "Grub".to_string(),
        }));
        // A lethal tick does not announce the effects that ran out with it
        assert!(!events
            .iter()
            .any(|event| matches!(event, BattleEvent::StatusExpired { .. })));
        assert_eq!(battle.status(), BattleStatus::Victory);
        assert!(events.contains(&BattleEvent::ExperienceGained {
            name: "Aldric".to_string(),
            amount: 20,
        }));
    }

    #[test]
    fn test_poison_ticks_before_burn() {
        let players = vec![TestCombatantBuilder::new("Aldric", CharacterClass::Warrior).build()];
        let enemies = vec![TestCombatantBuilder::new("Grub", CharacterClass::Rogue)
            .with_status(StatusKind::Burn)
            .with_status(StatusKind::Poison)
            .build()];
        let mut battle = create_test_battle(players, enemies);

        let grub = expect_next_actor(&mut battle);
        battle.execute_action(Action::defend(grub));

        // 5% and 7% of 90
        assert_eq!(
            status_damage(battle.log().events()),
            vec![(StatusKind::Poison, 4, 86), (StatusKind::Burn, 6, 80)]
        );
    }

    #[test]
    fn test_iron_wall_lasts_through_the_enemy_turn_and_announces_expiry() {
        let players = vec![TestCombatantBuilder::new("Aldric", CharacterClass::Warrior).build()];
        let enemies = vec![TestCombatantBuilder::new("Borin", CharacterClass::Warrior).build()];
        let mut battle = create_test_battle(players, enemies);

        let aldric = expect_next_actor(&mut battle);
        battle.execute_action(Action::skill(aldric, SkillId::IronWall, aldric));
        assert_eq!(battle.players()[0].effects.remaining(StatusKind::Shielded), Some(1));
        assert_eq!(battle.players()[0].effective_defense(), 30.0);

        let borin = expect_next_actor(&mut battle);
        battle.execute_action(Action::defend(borin));
        assert!(battle.players()[0].has_status(StatusKind::Shielded));

        let aldric = expect_next_actor(&mut battle);
        battle.execute_action(Action::defend(aldric));

        assert!(!battle.players()[0].has_status(StatusKind::Shielded));
        assert!(battle.log().events().contains(&BattleEvent::StatusExpired {
            target: "Aldric".to_string(),
            status: StatusKind::Shielded,
        }));
    }

    #[test]
    fn test_haste_applies_from_the_next_round() {
        let players = vec![TestCombatantBuilder::new("Vex", CharacterClass::Rogue)
            .with_mp(40)
            .build()];
        let enemies = vec![TestCombatantBuilder::new("Sly", CharacterClass::Rogue)
            .with_level(2)
            .build()];
        let mut battle = create_test_battle(players, enemies);

        // Sly (20) outpaces Vex (18)
        let sly = expect_next_actor(&mut battle);
        assert_eq!(sly, CombatantId::enemy(0));
        battle.execute_action(Action::defend(sly));

        let vex = expect_next_actor(&mut battle);
        battle.execute_action(Action::skill(vex, SkillId::Haste, vex));
        assert_eq!(battle.players()[0].effective_speed(), 23);

        // 18 * 1.3 rounds to 23, ahead of Sly from round two
        assert_eq!(expect_next_actor(&mut battle), CombatantId::player(0));
    }
}
