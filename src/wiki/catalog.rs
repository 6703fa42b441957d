use crate::models::item::display_name;
use crate::models::DownloadItem;
use log::warn;
use url::Url;

/// Known perk images as (hash path, upload name, local name).
///
/// The hash path is the two-level directory the wiki's image store files an
/// upload under; together with the upload name it forms the direct URL.
pub const PERK_IMAGES: &[(&str, &str, &str)] = &[
    ("0/06", "2D20_Action_Boy.png", "action_boy.png"),
    ("2/2d", "2D20_Adamantium_Skeleton.png", "adamantium_skeleton.png"),
    ("7/7a", "2D20_Adrenaline_Rush.png", "adrenaline_rush.png"),
    ("8/8a", "2D20_Animal_Friend.png", "animal_friend.png"),
    ("1/1f", "2D20_Aquaboy.png", "aquaboy.png"),
    ("4/4d", "2D20_Armorer.png", "armorer.png"),
    ("5/53", "2D20_Awareness.png", "awareness.png"),
    ("c/c4", "2D20_Barbarian.png", "barbarian.png"),
    ("8/80", "2D20_Basher.png", "basher.png"),
    ("c/c7", "2D20_Better_Criticals.png", "better_criticals.png"),
    ("5/50", "2D20_Big_Leagues.png", "big_leagues.png"),
    ("8/87", "2D20_Black_Widow.png", "black_widow.png"),
    ("1/1a", "2D20_Blacksmith.png", "blacksmith.png"),
    ("d/df", "2D20_Blitz.png", "blitz.png"),
    ("8/8f", "2D20_Bloody_Mess.png", "bloody_mess.png"),
    ("6/6a", "2D20_Can_Do.png", "can_do.png"),
    ("5/5f", "2D20_Cap_Collector.png", "cap_collector.png"),
    ("7/7f", "2d20_Cautious_Nature.png", "cautious_nature.png"),
    ("e/e0", "2d20_Center_Mass.png", "center_mass.png"),
    ("3/31", "2D20_Chem_Resistant.png", "chem_resistant.png"),
    ("0/09", "2D20_Chemist.png", "chemist.png"),
    ("5/5d", "2D20_Commando.png", "commando.png"),
    ("3/3e", "2D20_Comprehension.png", "comprehension.png"),
    ("a/a9", "2D20_Concentrated_Fire.png", "concentrated_fire.png"),
    ("b/ba", "2d20_Daring_Nature.png", "daring_nature.png"),
    ("0/09", "2D20_Demolition_Expert.png", "demolition_expert.png"),
    ("2/24", "2D20_Dodger.png", "dodger.png"),
    ("1/19", "2D20_Dogmeat.png", "dogmeat.png"),
    ("2/2f", "2d20_EMT.png", "emt.png"),
    ("5/5f", "2D20_Fast_Metabolism.png", "fast_metabolism.png"),
    ("0/06", "2D20_Faster_Healing.png", "faster_healing.png"),
    ("b/bf", "2D20_Finesse.png", "finesse.png"),
    ("e/e2", "2D20_Fortune_Finder.png", "fortune_finder.png"),
    ("5/5b", "2d20_Ghost.png", "ghost.png"),
    ("1/16", "2D20_Ghoulish.png", "ghoulish.png"),
    ("4/46", "2D20_Gun_Fu.png", "gun_fu.png"),
    ("a/a4", "2D20_Gun_Nut.png", "gun_nut.png"),
    ("2/2a", "2D20_Gunslinger.png", "gunslinger.png"),
    ("f/f2", "2D20_Hacker.png", "hacker.png"),
    ("9/90", "2d20_Healer.png", "healer.png"),
    ("f/f0", "2d20_Heave_Ho.png", "heave_ho.png"),
    ("1/1c", "2d20_Hunter.png", "hunter.png"),
    ("7/75", "2D20_Infiltrator.png", "infiltrator.png"),
    ("1/15", "2D20_Inspirational.png", "inspirational.png"),
    ("9/95", "2D20_Intense_Training.png", "intense_training.png"),
    ("d/d4", "2D20_Iron_Fist.png", "iron_fist.png"),
    ("a/ac", "2d20_Jury_Rigger.png", "jury_rigger.png"),
    ("6/67", "2d20_Laser_Commander.png", "laser_commander.png"),
    ("3/37", "2D20_Lead_Belly.png", "lead_belly.png"),
    ("6/6b", "2D20_Life_Giver.png", "life_giver.png"),
    ("9/93", "2D20_Lightstep.png", "lightstep.png"),
    ("8/8e", "2D20_Master_Thief.png", "master_thief.png"),
    ("7/72", "2D20_Medic.png", "medic.png"),
    ("3/30", "2d20_Meltdown.png", "meltdown.png"),
    ("0/09", "2d20_Mister_Sandman.png", "mister_sandman.png"),
    ("5/5a", "2D20_Moving_Target.png", "moving_target.png"),
    ("e/ea", "2D20_Mysterious_Stranger.png", "mysterious_stranger.png"),
    ("3/39", "2D20_Nerd_Rage.png", "nerd_rage.png"),
    ("6/69", "2D20_Night_Person.png", "night_person.png"),
    ("e/e7", "2D20_Ninja.png", "ninja.png"),
    ("5/56", "2D20_Nuclear_Physicist.png", "nuclear_physicist.png"),
    ("9/91", "2D20_Pain_Train.png", "pain_train.png"),
    ("4/47", "2d20_Paralyzing_Palm.png", "paralyzing_palm.png"),
    ("7/7c", "2D20_Party_Boy.png", "party_boy.png"),
    ("9/99", "2d20_Pathfinder.png", "pathfinder.png"),
    ("f/f8", "2D20_Pharma_Farma.png", "pharma_farma.png"),
    ("6/6f", "2D20_Pick_Pocket.png", "pick_pocket.png"),
    ("d/df", "2d20_Piercing_Strike.png", "piercing_strike.png"),
    ("8/8c", "2d20_Pyromaniac.png", "pyromaniac.png"),
    ("e/ee", "2d20_Quick_hands.png", "quick_hands.png"),
    ("5/50", "2D20_Quickhands.png", "quickhands.png"),
    ("9/92", "2D20_Rad_Resistance.png", "rad_resistance.png"),
    ("1/14", "2D20_Refractor.png", "refractor.png"),
    ("3/3f", "2D20_Ricochet.png", "ricochet.png"),
    ("f/ff", "2D20_Rifleman.png", "rifleman.png"),
    ("d/dd", "2D20_Robotics_Expert.png", "robotics_expert.png"),
    ("9/96", "2D20_Science.png", "science.png"),
    ("6/64", "2D20_Scoundrel.png", "scoundrel.png"),
    ("7/79", "2D20_Scrapper.png", "scrapper.png"),
    ("8/85", "2D20_Scrounger.png", "scrounger.png"),
    ("5/50", "2d20_Shotgun_Surgeon.png", "shotgun_surgeon.png"),
    ("f/f0", "2D20_Size_Matters.png", "size_matters.png"),
    ("4/41", "2d20_Skilled.png", "skilled.png"),
    ("b/b7", "2d20_Slayer_vault_boy.png", "slayer.png"),
    ("8/8a", "2d20_Smooth_talker.png", "smooth_talker.png"),
    ("7/7e", "2d20_Snakeater.png", "snakeater.png"),
    ("4/44", "2D20_Sniper.png", "sniper.png"),
    ("0/0b", "2D20_Solar_Powered.png", "solar_powered.png"),
    ("4/4f", "2D20_Strong_Back.png", "strong_back.png"),
    ("e/ed", "2D20_Tag.png", "tag.png"),
    ("a/a7", "2D20_Tales_of_Junktown_Jerky_Vendor.png", "tales_of_junktown.png"),
    ("1/14", "2d20_Terrifying_Presence.png", "terrifying_presence.png"),
    ("8/83", "2D20_Toughness.png", "toughness.png"),
];

/// Perk names whose uploads follow the `File:2D20_<name>.png` convention.
///
/// Covers perks with no known hash path; their URLs come from an API lookup.
pub const PERK_NAMES: &[&str] = &[
    "Action Boy", "Adamantium Skeleton", "Adrenaline Rush", "Animal Friend", "Aquaboy",
    "Armorer", "Awareness", "Barbarian", "Better Criticals", "Big Leagues", "Blacksmith",
    "Blitz", "Bloody Mess", "Bodyguard", "Cannibal", "Cap Collector", "Chem Resistant",
    "Chemist", "Commando", "Concentrated Fire", "Critical Banker", "Demolition Expert",
    "Dogmeat's Friend", "Durable", "Educated", "Entomologist", "Fast Metabolism", "Finesse",
    "Fortune Finder", "Four Leaf Clover", "Ghoulish", "Globe Trotter", "Gun Fu", "Gun Nut",
    "Gunslinger", "Hacker", "Heavy Gunner", "Here and Now", "Healer", "Idiot Savant",
    "Infiltrator", "Inspirational", "Intense Training", "Intimidation", "Iron Fist",
    "Lady Killer", "Black Widow", "Lead Belly", "Life Giver", "Light Step", "Local Leader",
    "Locksmith", "Lone Wanderer", "Medic", "Mister Sandman", "Moving Target",
    "Mysterious Stranger", "Nerd Rage", "Night Person", "Ninja", "Nuclear Physicist",
    "Pain Train", "Party Boy", "Party Girl", "Penetrator", "Pickpocket", "Pyromaniac",
    "Quick Hands", "Quick Draw", "Rad Resistant", "Refractor", "Ricochet", "Rifleman",
    "Robotics Expert", "Rooted", "Science!", "Scrapper", "Scrounger", "Sensory Deprivation",
    "Sharpshooter", "Sneak", "Sniper", "Solar Powered", "Spray n' Pray", "Steady Aim",
    "Stealth", "Strong Back", "Tag!", "Toughness", "Tracker", "V.A.N.S",
    "Wasteland Whisperer",
];

/// Direct-URL items for every entry in [`PERK_IMAGES`], rooted at `image_base`.
pub fn static_catalog(image_base: &str) -> Vec<DownloadItem> {
    let base = image_base.trim_end_matches('/');
    PERK_IMAGES
        .iter()
        .filter_map(|(hash, upload, local)| {
            let raw = format!("{}/{}/{}", base, hash, upload);
            match Url::parse(&raw) {
                Ok(url) => Some(DownloadItem::from_url(display_name(upload), url, *local)),
                Err(e) => {
                    warn!("Skipping {}: bad url {}: {}", upload, raw, e);
                    None
                }
            }
        })
        .collect()
}

/// Wiki-file items for every entry in [`PERK_NAMES`].
pub fn name_catalog() -> Vec<DownloadItem> {
    PERK_NAMES
        .iter()
        .map(|name| DownloadItem::from_wiki_title(&format!("File:2D20_{}.png", name)))
        .collect()
}
