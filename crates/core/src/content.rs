use bitflags::bitflags;

use crate::types::{EffectKind, EnemyKind, WeaponKind};

bitflags! {
    /// Special behaviors an enemy kind carries. Checked at a single dispatch point
    /// during activation and death handling.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Abilities: u8 {
        const ALERTS_ALL         = 1 << 0;
        const HEALS_FROM_CORPSES = 1 << 1;
        const TELEPORT           = 1 << 2;
        const EXPLODES           = 1 << 3;
        const DESTROYS_COVER     = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Low,
    Elevated,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub name: &'static str,
    pub damage_min: u32,
    pub damage_max: u32,
    pub range: u32,
    pub ap_cost: u32,
    pub base_accuracy: u32,
    /// `None` for weapons that never run dry.
    pub ammo_capacity: Option<u32>,
    pub melee: bool,
    pub on_hit: Option<(EffectKind, u32)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub kind: EnemyKind,
    pub name: &'static str,
    pub tier: Tier,
    pub hp: i32,
    pub ap: u32,
    pub weapon: WeaponKind,
    /// Flat percentage removed from every hit this kind takes.
    pub armor_pct: u32,
    pub detection_radius: u32,
    pub abilities: Abilities,
    /// Stronger form the corruption director may mutate this kind into.
    pub variant: Option<EnemyKind>,
}

pub fn weapon_template(kind: WeaponKind) -> Weapon {
    use WeaponKind as W;
    let claws = Weapon {
        kind,
        name: "Claws",
        damage_min: 2,
        damage_max: 4,
        range: 1,
        ap_cost: 1,
        base_accuracy: 75,
        ammo_capacity: None,
        melee: true,
        on_hit: None,
    };
    let ranged = Weapon { melee: false, ..claws };
    match kind {
        W::Rifle => Weapon {
            name: "Service Rifle",
            damage_min: 4,
            damage_max: 7,
            range: 10,
            ap_cost: 2,
            base_accuracy: 70,
            ammo_capacity: Some(6),
            ..ranged
        },
        W::Pistol => Weapon {
            name: "Sidearm",
            damage_max: 4,
            range: 6,
            ammo_capacity: Some(8),
            ..ranged
        },
        W::Shotgun => Weapon {
            name: "Breacher Shotgun",
            damage_min: 6,
            damage_max: 10,
            range: 4,
            ap_cost: 2,
            base_accuracy: 65,
            ammo_capacity: Some(2),
            on_hit: Some((EffectKind::Bleeding, 2)),
            ..ranged
        },
        W::Claws => claws,
        W::AcidGlob => Weapon {
            name: "Acid Glob",
            damage_max: 3,
            range: 6,
            ap_cost: 2,
            base_accuracy: 60,
            on_hit: Some((EffectKind::Poisoned, 3)),
            ..ranged
        },
        W::Cleaver => Weapon {
            name: "Cleaver",
            damage_min: 4,
            damage_max: 6,
            ap_cost: 2,
            base_accuracy: 70,
            ..claws
        },
        W::Maw => Weapon { name: "Maw", damage_min: 3, damage_max: 5, base_accuracy: 70, ..claws },
        W::RendingClaws => Weapon {
            name: "Rending Claws",
            damage_min: 3,
            damage_max: 6,
            base_accuracy: 80,
            on_hit: Some((EffectKind::Bleeding, 2)),
            ..claws
        },
        W::VenomLance => Weapon {
            name: "Venom Lance",
            damage_min: 3,
            damage_max: 5,
            range: 7,
            ap_cost: 2,
            base_accuracy: 65,
            on_hit: Some((EffectKind::Poisoned, 4)),
            ..ranged
        },
        W::SiegeFists => Weapon {
            name: "Siege Fists",
            damage_min: 6,
            damage_max: 9,
            ap_cost: 2,
            base_accuracy: 70,
            on_hit: Some((EffectKind::Slowed, 2)),
            ..claws
        },
        W::VoidLash => Weapon {
            name: "Void Lash",
            damage_min: 6,
            damage_max: 10,
            range: 3,
            ap_cost: 2,
            base_accuracy: 80,
            on_hit: Some((EffectKind::Stunned, 1)),
            ..ranged
        },
    }
}

pub fn enemy_template(kind: EnemyKind) -> EnemyTemplate {
    use EnemyKind as E;
    let base = EnemyTemplate {
        kind,
        name: "",
        tier: Tier::Low,
        hp: 10,
        ap: 2,
        weapon: WeaponKind::Claws,
        armor_pct: 0,
        detection_radius: 5,
        abilities: Abilities::empty(),
        variant: None,
    };
    match kind {
        E::Crawler => EnemyTemplate {
            name: "Crawler",
            hp: 8,
            ap: 3,
            detection_radius: 4,
            variant: Some(E::Ravager),
            ..base
        },
        E::Spitter => EnemyTemplate {
            name: "Spitter",
            hp: 9,
            weapon: WeaponKind::AcidGlob,
            detection_radius: 8,
            variant: Some(E::Venomspitter),
            ..base
        },
        E::Brute => EnemyTemplate {
            name: "Brute",
            hp: 18,
            weapon: WeaponKind::Cleaver,
            armor_pct: 30,
            abilities: Abilities::DESTROYS_COVER,
            variant: Some(E::Juggernaut),
            ..base
        },
        E::Stalker => EnemyTemplate {
            name: "Stalker",
            hp: 10,
            ap: 3,
            detection_radius: 7,
            abilities: Abilities::TELEPORT,
            ..base
        },
        E::Howler => EnemyTemplate {
            name: "Howler",
            hp: 7,
            detection_radius: 7,
            abilities: Abilities::ALERTS_ALL,
            ..base
        },
        E::Ghoul => EnemyTemplate {
            name: "Ghoul",
            hp: 12,
            weapon: WeaponKind::Maw,
            abilities: Abilities::HEALS_FROM_CORPSES,
            ..base
        },
        E::Bloater => EnemyTemplate {
            name: "Bloater",
            hp: 6,
            ap: 1,
            detection_radius: 4,
            abilities: Abilities::EXPLODES,
            ..base
        },
        E::Ravager => EnemyTemplate {
            name: "Ravager",
            tier: Tier::Elevated,
            hp: 14,
            ap: 4,
            weapon: WeaponKind::RendingClaws,
            detection_radius: 6,
            ..base
        },
        E::Venomspitter => EnemyTemplate {
            name: "Venomspitter",
            tier: Tier::Elevated,
            hp: 14,
            ap: 3,
            weapon: WeaponKind::VenomLance,
            detection_radius: 9,
            ..base
        },
        E::Juggernaut => EnemyTemplate {
            name: "Juggernaut",
            tier: Tier::Elevated,
            hp: 28,
            ap: 3,
            weapon: WeaponKind::SiegeFists,
            armor_pct: 40,
            detection_radius: 6,
            abilities: Abilities::DESTROYS_COVER,
            ..base
        },
        E::Overseer => EnemyTemplate {
            name: "Overseer",
            tier: Tier::Boss,
            hp: 60,
            ap: 4,
            weapon: WeaponKind::VoidLash,
            armor_pct: 20,
            detection_radius: 12,
            abilities: Abilities::ALERTS_ALL.union(Abilities::DESTROYS_COVER),
            ..base
        },
    }
}

/// Elevated kinds the director may spawn outright.
pub const ELEVATED_SPAWNS: [EnemyKind; 3] =
    [EnemyKind::Ravager, EnemyKind::Venomspitter, EnemyKind::Juggernaut];

pub const BOSS_KIND: EnemyKind = EnemyKind::Overseer;
