//! Equipment and skill commands.

use crate::error::DispatchError;
use crate::types::EquipmentSlot;

use super::Dispatcher;

fn slot_for_arg(arg: &str) -> Option<EquipmentSlot> {
    match arg {
        "weapon" => Some(EquipmentSlot::Weapon),
        "armor" => Some(EquipmentSlot::Armor),
        "technique" | "main_technique" => Some(EquipmentSlot::MainTechnique),
        _ => None,
    }
}

pub fn show_equipment(dispatcher: &Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player(user_id)?;
    let eq = &player.equipment;
    Ok(format!(
        "weapon: {} | armor: {} | technique: {} | storage ring: {}",
        eq.weapon.as_deref().unwrap_or("none"),
        eq.armor.as_deref().unwrap_or("none"),
        eq.main_technique.as_deref().unwrap_or("none"),
        eq.storage_ring.as_deref().unwrap_or("none"),
    ))
}

/// `equip <item_name>`: retrieves the named item from the storage ring,
/// validates its realm requirement, and swaps it into the resolved slot —
/// returning any previously equipped item to the ring.
pub fn equip(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let item_name = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "equip requires an item name".to_string(),
    })?;

    let (slot, realm_requirement) = if let Some(technique) = dispatcher.catalogs.technique(item_name) {
        (EquipmentSlot::MainTechnique, technique.realm_requirement)
    } else if let Some(item) = dispatcher.catalogs.item(item_name) {
        let slot = match item.kind {
            crate::config::ItemKind::Weapon => EquipmentSlot::Weapon,
            crate::config::ItemKind::Armor => EquipmentSlot::Armor,
            crate::config::ItemKind::MainTechnique | crate::config::ItemKind::Technique => EquipmentSlot::MainTechnique,
            _ => {
                return Err(DispatchError::PreconditionNotMet {
                    reason: format!("{item_name} is not equippable"),
                })
            }
        };
        (slot, item.realm_requirement)
    } else {
        return Err(DispatchError::NotFound {
            kind: "item".to_string(),
            name: item_name.to_string(),
        });
    };

    let player = dispatcher.player_mut(user_id)?;
    if player.realm_index < realm_requirement as usize {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("{item_name} requires realm {realm_requirement}"),
        });
    }
    if !player.storage_ring.has(item_name, 1) {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("{item_name} is not in your storage ring"),
        });
    }

    player.storage_ring.retrieve(item_name, 1)?;
    if let Some(previous) = player.equipment.get(slot).clone() {
        player.storage_ring.store(&previous, 1)?;
    }
    player.equipment.set(slot, Some(item_name.to_string()));
    Ok(format!("equipped {item_name}"))
}

/// `unequip {weapon|armor|technique}`: returns the item in that slot to
/// the storage ring.
pub fn unequip(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let arg = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "unequip requires a slot name".to_string(),
    })?;
    let slot = slot_for_arg(arg).ok_or_else(|| DispatchError::NotFound {
        kind: "equipment_slot".to_string(),
        name: arg.to_string(),
    })?;

    let player = dispatcher.player_mut(user_id)?;
    let Some(item_name) = player.equipment.get(slot).clone() else {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("no item equipped in {arg}"),
        });
    };
    player.storage_ring.store(&item_name, 1)?;
    player.equipment.set(slot, None);
    Ok(format!("unequipped {item_name}"))
}

pub fn skill_list(dispatcher: &Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player(user_id)?;
    if player.learned_skills.is_empty() {
        return Ok("no skills learned".to_string());
    }
    let mut skills: Vec<&str> = player.learned_skills.iter().map(String::as_str).collect();
    skills.sort_unstable();
    Ok(skills.join(", "))
}

pub fn learn_skill(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let skill_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "learn_skill requires a skill id".to_string(),
    })?;
    let def = dispatcher.catalogs.skill(skill_id).ok_or_else(|| DispatchError::NotFound {
        kind: "skill".to_string(),
        name: skill_id.to_string(),
    })?;
    let realm_requirement = def.realm_requirement;
    let price = def.price;

    let player = dispatcher.player_mut(user_id)?;
    if player.learned_skills.contains(*skill_id) {
        return Err(DispatchError::Conflict {
            reason: format!("{skill_id} already learned"),
        });
    }
    if player.realm_index < realm_requirement as usize {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("{skill_id} requires realm {realm_requirement}"),
        });
    }
    if player.gold < price {
        return Err(DispatchError::PreconditionNotMet {
            reason: format!("need {price} gold, have {}", player.gold),
        });
    }
    player.gold -= price;
    player.learned_skills.insert(skill_id.to_string());
    Ok(format!("learned {skill_id}"))
}

pub fn equip_skill(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let skill_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "equip_skill requires a skill id".to_string(),
    })?;
    let player = dispatcher.player_mut(user_id)?;
    if player.equip_skill(skill_id) {
        Ok(format!("equipped skill {skill_id}"))
    } else {
        Err(DispatchError::PreconditionNotMet {
            reason: format!("cannot equip {skill_id}: not learned, or both skill slots full"),
        })
    }
}

pub fn unequip_skill(dispatcher: &mut Dispatcher, user_id: &str, args: &[&str]) -> Result<String, DispatchError> {
    let skill_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "unequip_skill requires a skill id".to_string(),
    })?;
    let player = dispatcher.player_mut(user_id)?;
    player.unequip_skill(skill_id);
    Ok(format!("unequipped skill {skill_id}"))
}

pub fn skill_info(dispatcher: &Dispatcher, args: &[&str]) -> Result<String, DispatchError> {
    let skill_id = args.first().ok_or_else(|| DispatchError::PreconditionNotMet {
        reason: "skill_info requires a skill id".to_string(),
    })?;
    let def = dispatcher.catalogs.skill(skill_id).ok_or_else(|| DispatchError::NotFound {
        kind: "skill".to_string(),
        name: skill_id.to_string(),
    })?;
    Ok(format!(
        "{}: {:?} base {} ratio {} mp {} cooldown {} realm {} price {}",
        def.name, def.damage_kind, def.base_damage, def.attack_ratio, def.mp_cost, def.cooldown, def.realm_requirement, def.price
    ))
}

pub fn available_skills(dispatcher: &Dispatcher, user_id: &str) -> Result<String, DispatchError> {
    let player = dispatcher.player(user_id)?;
    let mut names: Vec<&str> = dispatcher
        .catalogs
        .skills
        .values()
        .filter(|s| s.realm_requirement as usize <= player.realm_index)
        .map(|s| s.id.as_str())
        .collect();
    names.sort_unstable();
    Ok(names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dispatcher_with_player() -> Dispatcher {
        let mut d = Dispatcher::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        super::super::identity::enter_cultivation(&mut d, "u1", "Alice", &[], 0, &mut rng).unwrap();
        d.player_mut("u1").unwrap().gold = 10_000;
        d
    }

    #[test]
    fn equip_requires_item_in_ring() {
        let mut d = dispatcher_with_player();
        let item_id = d.catalogs.items.values().next().unwrap().id.clone();
        assert!(matches!(equip(&mut d, "u1", &[&item_id]), Err(DispatchError::PreconditionNotMet { .. })));
    }

    #[test]
    fn equip_then_unequip_round_trips_through_ring() {
        let mut d = dispatcher_with_player();
        let item_id = d.catalogs.items.values().find(|i| matches!(i.kind, crate::config::ItemKind::Weapon)).unwrap().id.clone();
        d.player_mut("u1").unwrap().storage_ring.store(&item_id, 1).unwrap();
        equip(&mut d, "u1", &[&item_id]).unwrap();
        assert_eq!(d.player("u1").unwrap().equipment.weapon.as_deref(), Some(item_id.as_str()));
        unequip(&mut d, "u1", &["weapon"]).unwrap();
        assert!(d.player("u1").unwrap().storage_ring.has(&item_id, 1));
    }

    #[test]
    fn learn_and_equip_skill() {
        let mut d = dispatcher_with_player();
        let skill_id = d.catalogs.skills.values().find(|s| s.realm_requirement == 0).unwrap().id.clone();
        learn_skill(&mut d, "u1", &[&skill_id]).unwrap();
        equip_skill(&mut d, "u1", &[&skill_id]).unwrap();
        assert!(d.player("u1").unwrap().equipped_skills.contains(&skill_id));
    }
}
