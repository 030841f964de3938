use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tactics::{Direction, Game, Intent, IntentJournal, ItemKind, MissionSetup, Phase, Pos};
use tools::{init_tracing, load_config, load_setup};

const DEFAULT_SCENARIO: &str = "
    ####################
    #@....h.....#....v.#
    #.....#..c..+..r...#
    #..m..#.....#......#
    #.....H..w..#..g...#
    #..k..#.....#..e...#
    #.....#.b...#.....X#
    ####################
";

const ITEMS: [ItemKind; 6] = [
    ItemKind::Medkit,
    ItemKind::Grenade,
    ItemKind::PurgeVial,
    ItemKind::ArmorPlate,
    ItemKind::Stimpack,
    ItemKind::Keycard,
];

/// Drives a mission with random intents and checks state invariants after each one.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    intents: u32,
    /// ASCII scenario layout; a built-in mission when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the accepted intents as a replayable journal
    #[arg(long)]
    journal_out: Option<PathBuf>,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    slice[rng.next_u64() as usize % slice.len()]
}

fn random_intent(rng: &mut ChaCha8Rng, game: &Game) -> Intent {
    let player = game.state().player_pos();
    let nearby = Pos::new(
        player.y + (rng.next_u32() % 9) as i32 - 4,
        player.x + (rng.next_u32() % 9) as i32 - 4,
    );
    match rng.next_u32() % 10 {
        // Bias toward movement so missions actually progress
        0..=3 => Intent::Move(choose(rng, &Direction::ALL)),
        4 | 5 => {
            let enemies: Vec<Pos> = game
                .state()
                .actors
                .iter()
                .filter(|actor| !actor.is_player())
                .map(|actor| actor.pos)
                .collect();
            let target = if enemies.is_empty() { nearby } else { choose(rng, &enemies) };
            Intent::Attack(target)
        }
        6 => Intent::UseItem { item: choose(rng, &ITEMS), target: Some(nearby) },
        7 => Intent::Reload,
        _ => Intent::EndTurn,
    }
}

fn check_invariants(game: &Game) -> Result<()> {
    let state = game.state();
    let config = game.config();
    let mut occupied = HashSet::new();
    for actor in state.actors.iter() {
        ensure!(actor.hp <= actor.max_hp, "Invariant failed: HP > Max HP for {:?}", actor.kind);
        ensure!(actor.hp >= 0, "Invariant failed: negative HP for {:?}", actor.kind);
        ensure!(
            actor.is_player() || actor.hp > 0,
            "Invariant failed: dead {:?} still registered",
            actor.kind
        );
        ensure!(
            actor.ap <= actor.max_ap + config.items.stim_ap,
            "Invariant failed: AP above cap for {:?}",
            actor.kind
        );
        ensure!(state.map.is_walkable(actor.pos), "Invariant failed: actor inside blocking tile");
        ensure!(occupied.insert(actor.pos), "Invariant failed: two actors on {:?}", actor.pos);
        ensure!(
            actor.effects.iter().all(|(_, remaining)| *remaining > 0),
            "Invariant failed: expired effect kept on {:?}",
            actor.kind
        );
    }
    ensure!(
        game.corruption().value <= config.corruption.max,
        "Invariant failed: corruption above max"
    );
    if game.turn().phase == Phase::ResolvingEnemyTurn {
        bail!("Invariant failed: submit returned during the enemy phase");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let setup = match &args.scenario {
        Some(path) => load_setup(path)?,
        None => MissionSetup::from_ascii(DEFAULT_SCENARIO).context("built-in scenario")?,
    };
    let config = load_config(args.config.as_deref())?;

    println!("Starting fuzz harness on seed {} for max {} intents...", args.seed, args.intents);
    let mut game = Game::new(args.seed, setup, config);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut journal = IntentJournal::new(args.seed);
    let mut rejected = 0u32;

    for step in 0..args.intents {
        if let Some(outcome) = game.outcome() {
            println!("Finished with outcome {outcome:?} after {step} intents");
            break;
        }
        let intent = random_intent(&mut rng, &game);
        let before = game.snapshot_hash();
        match game.submit(intent) {
            Ok(_) => journal.push(intent),
            Err(err) => {
                rejected += 1;
                tracing::trace!(?intent, %err, "fuzz intent rejected");
                ensure!(
                    game.snapshot_hash() == before,
                    "Invariant failed: rejected {intent:?} changed state"
                );
            }
        }
        check_invariants(&game).with_context(|| format!("after intent #{step}: {intent:?}"))?;
    }

    if let Some(path) = &args.journal_out {
        let json = journal.to_json().context("failed to encode journal")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write journal: {}", path.display()))?;
    }
    println!(
        "Fuzzing completed successfully: turn {}, {} accepted, {rejected} rejected, hash {}.",
        game.turn().turn_count,
        journal.len(),
        game.snapshot_hash()
    );
    Ok(())
}
