use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use gen3_core::builder::CreatureBuilder;
use gen3_core::catalog::Catalog;
use gen3_core::core_api::{
    AbilitySlot, BoxEntry, CreatureView, Engine, Game as CoreGame, InsertOutcome, Session,
};
use gen3_core::gender::Gender;
use gen3_core::stats;
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum GameKind {
    FireRed,
    RadicalRed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum GenderArg {
    Male,
    Female,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AbilityArg {
    First,
    Second,
    Hidden,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.sav")]
    path: PathBuf,
    #[arg(
        long,
        value_name = "fr|rr|firered|radicalred",
        value_parser = parse_game_kind
    )]
    game: Option<GameKind>,
    #[arg(long, value_name = "CATALOG.json")]
    catalog: Option<PathBuf>,
    #[arg(long, short)]
    verbose: bool,
    #[arg(long)]
    trainer: bool,
    #[arg(long)]
    money: bool,
    #[arg(long)]
    coins: bool,
    #[arg(long = "play-time")]
    play_time: bool,
    #[arg(long)]
    dex: bool,
    #[arg(long)]
    team: bool,
    #[arg(long = "box", value_name = "INDEX")]
    box_index: Option<usize>,
    #[arg(long)]
    boxes: bool,
    #[arg(long)]
    json: bool,
    #[arg(long = "set-money")]
    set_money: Option<u32>,
    #[arg(long = "set-coins")]
    set_coins: Option<u16>,
    #[arg(long = "set-trainer-name")]
    set_trainer_name: Option<String>,
    #[arg(long = "set-seen", value_name = "SPECIES")]
    set_seen: Vec<String>,
    #[arg(long = "set-caught", value_name = "SPECIES")]
    set_caught: Vec<String>,
    #[arg(long = "unset-seen", value_name = "SPECIES")]
    unset_seen: Vec<String>,
    #[arg(long = "unset-caught", value_name = "SPECIES")]
    unset_caught: Vec<String>,
    #[arg(long = "remove-team-slot", value_name = "SLOT")]
    remove_team_slot: Option<usize>,
    #[arg(long = "clone-lead")]
    clone_lead: bool,
    #[arg(long = "box-index", value_name = "BOX")]
    edit_box: Option<usize>,
    #[arg(long = "box-slot", value_name = "SLOT", requires = "set_species")]
    edit_box_slot: Option<usize>,
    #[arg(
        long = "set-species",
        value_name = "SPECIES",
        requires_all = ["edit_box", "edit_box_slot"]
    )]
    set_species: Option<String>,
    #[arg(long = "set-box-name", value_name = "NAME", requires = "edit_box")]
    set_box_name: Option<String>,
    #[arg(long = "export-team-slot", value_name = "SLOT", requires = "export_out")]
    export_team_slot: Option<usize>,
    #[arg(long = "export-out", value_name = "PATH", requires = "export_team_slot")]
    export_out: Option<PathBuf>,
    #[arg(long = "export-decrypted", requires = "export_team_slot")]
    export_decrypted: bool,
    #[arg(long = "add-creature", value_name = "SPECIES")]
    add_creature: Option<String>,
    #[arg(long = "team-slot", value_name = "SLOT", requires = "add_creature")]
    team_slot: Option<usize>,
    #[arg(long, default_value_t = 5)]
    level: u8,
    #[arg(long, requires = "add_creature")]
    nickname: Option<String>,
    #[arg(long, requires = "add_creature")]
    nature: Option<String>,
    #[arg(long, value_enum, requires = "add_creature")]
    ability: Option<AbilityArg>,
    #[arg(long, requires = "add_creature")]
    seed: Option<u64>,
    #[arg(long, requires = "add_creature")]
    shiny: bool,
    #[arg(long, requires = "add_creature")]
    item: Option<String>,
    #[arg(long, value_delimiter = ',', requires = "add_creature")]
    ivs: Option<Vec<u8>>,
    #[arg(long, value_delimiter = ',', requires = "add_creature")]
    evs: Option<Vec<u16>>,
    #[arg(long = "ot-name", requires = "add_creature")]
    ot_name: Option<String>,
    #[arg(long = "ot-id", requires = "add_creature")]
    ot_id: Option<u64>,
    #[arg(long = "ot-gender", value_enum, requires = "add_creature")]
    ot_gender: Option<GenderArg>,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy)]
struct FieldSelection {
    trainer: bool,
    money: bool,
    coins: bool,
    play_time: bool,
    dex: bool,
    team: bool,
    box_index: Option<usize>,
    boxes: bool,
}

impl FieldSelection {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            trainer: cli.trainer,
            money: cli.money,
            coins: cli.coins,
            play_time: cli.play_time,
            dex: cli.dex,
            team: cli.team,
            box_index: cli.box_index,
            boxes: cli.boxes,
        }
    }

    fn is_field_mode(&self) -> bool {
        self.trainer
            || self.money
            || self.coins
            || self.play_time
            || self.dex
            || self.team
            || self.box_index.is_some()
            || self.boxes
    }

    fn selected_pairs(
        &self,
        session: &Session,
        names: &Names<'_>,
    ) -> Result<Vec<(&'static str, String)>, String> {
        let snapshot = session.snapshot();
        let mut out = Vec::new();

        if self.trainer {
            out.push(("trainer", snapshot.trainer_name.clone()));
            out.push(("gender", snapshot.gender.to_string()));
            out.push((
                "trainer_id",
                format!("{:05}/{:05}", snapshot.public_id, snapshot.secret_id),
            ));
        }
        if self.money {
            out.push(("money", snapshot.money.to_string()));
        }
        if self.coins {
            out.push(("coins", snapshot.coins.to_string()));
        }
        if self.play_time {
            out.push(("play_time", format_play_time(session)));
        }
        if self.dex {
            out.push(("dex_seen", snapshot.dex_seen.to_string()));
            out.push(("dex_caught", snapshot.dex_caught.to_string()));
        }
        if self.team {
            for (slot, view) in session.team().map_err(|e| e.to_string())?.iter().enumerate() {
                out.push(("team", format!("{slot}: {}", names.describe(view))));
            }
        }
        for entry in self.box_entries(session)? {
            out.push((
                "box",
                format!(
                    "{}/{}: {}",
                    entry.box_index,
                    entry.slot,
                    names.describe(&entry.creature)
                ),
            ));
        }

        Ok(out)
    }

    fn selected_json(
        &self,
        session: &Session,
        names: &Names<'_>,
    ) -> Result<JsonMap<String, JsonValue>, String> {
        let snapshot = session.snapshot();
        let mut out = JsonMap::new();

        if self.trainer {
            out.insert(
                "trainer".to_string(),
                JsonValue::String(snapshot.trainer_name.clone()),
            );
            out.insert(
                "gender".to_string(),
                JsonValue::String(snapshot.gender.to_string()),
            );
            out.insert("public_id".to_string(), JsonValue::from(snapshot.public_id));
            out.insert("secret_id".to_string(), JsonValue::from(snapshot.secret_id));
        }
        if self.money {
            out.insert("money".to_string(), JsonValue::from(snapshot.money));
        }
        if self.coins {
            out.insert("coins".to_string(), JsonValue::from(snapshot.coins));
        }
        if self.play_time {
            out.insert(
                "play_time".to_string(),
                JsonValue::String(format_play_time(session)),
            );
        }
        if self.dex {
            out.insert("dex_seen".to_string(), JsonValue::from(snapshot.dex_seen));
            out.insert(
                "dex_caught".to_string(),
                JsonValue::from(snapshot.dex_caught),
            );
        }
        if self.team {
            out.insert("team".to_string(), team_to_json(session, names)?);
        }
        if self.box_index.is_some() || self.boxes {
            let entries = self.box_entries(session)?;
            out.insert("boxes".to_string(), box_entries_to_json(&entries, names));
        }

        Ok(out)
    }

    fn box_entries(&self, session: &Session) -> Result<Vec<BoxEntry>, String> {
        if self.boxes {
            session.all_box_creatures().map_err(|e| e.to_string())
        } else if let Some(index) = self.box_index {
            session.box_creatures(index).map_err(|e| e.to_string())
        } else {
            Ok(Vec::new())
        }
    }
}

/// Optional name lookups for output; falls back to numeric ids.
struct Names<'a> {
    catalog: Option<&'a Catalog>,
}

impl Names<'_> {
    fn species(&self, id: u16) -> String {
        self.catalog
            .and_then(|c| c.species_name(id))
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{id}"))
    }

    fn move_name(&self, id: u16) -> String {
        self.catalog
            .and_then(|c| c.move_name(id))
            .map(str::to_string)
            .unwrap_or_else(|| format!("move {id}"))
    }

    fn item(&self, id: u16) -> Option<String> {
        if id == 0 {
            return None;
        }
        Some(
            self.catalog
                .and_then(|c| c.item_name(id))
                .map(str::to_string)
                .unwrap_or_else(|| format!("item {id}")),
        )
    }

    fn describe(&self, view: &CreatureView) -> String {
        let mut text = format!("{} ({})", view.nickname, self.species(view.species));
        if let Some(level) = view.level {
            text.push_str(&format!(" Lv{level}"));
        }
        text.push_str(&format!(" {}", view.nature_name));
        if view.is_shiny {
            text.push_str(" *");
        }
        if let Some(item) = self.item(view.held_item) {
            text.push_str(&format!(" @ {item}"));
        }
        let moves: Vec<String> = view
            .moves
            .iter()
            .filter(|&&m| m != 0)
            .map(|&m| self.move_name(m))
            .collect();
        if !moves.is_empty() {
            text.push_str(&format!(" [{}]", moves.join(", ")));
        }
        text
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let fields = FieldSelection::from_cli(&cli);
    let has_dex_edits = !(cli.set_seen.is_empty()
        && cli.set_caught.is_empty()
        && cli.unset_seen.is_empty()
        && cli.unset_caught.is_empty());
    let has_edits = cli.set_money.is_some()
        || cli.set_coins.is_some()
        || cli.set_trainer_name.is_some()
        || has_dex_edits
        || cli.remove_team_slot.is_some()
        || cli.clone_lead
        || cli.set_species.is_some()
        || cli.set_box_name.is_some()
        || cli.add_creature.is_some();

    if has_edits && cli.output.is_none() {
        eprintln!(
            "--set-*, --unset-*, --add-creature, --clone-lead and --remove-team-slot require --output <PATH>"
        );
        process::exit(2);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one edit flag");
        process::exit(2);
    }

    let catalog = cli.catalog.as_ref().map(|path| {
        Catalog::load_from_path(path).unwrap_or_else(|e| {
            eprintln!("Error loading catalog {}: {e}", path.display());
            process::exit(1);
        })
    });
    let names = Names {
        catalog: catalog.as_ref(),
    };

    let game_hint = cli.game.map(to_core_game);
    let bytes = fs::read(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    let engine = Engine::new();
    let mut session = engine.open_bytes(bytes, game_hint).unwrap_or_else(|e| {
        eprintln!("Error loading save file: {}", cli.path.display());
        eprintln!("  {}", e);
        process::exit(1);
    });
    debug!(
        game = session.game().as_str(),
        active = ?session.snapshot().active_slot,
        "save opened"
    );

    apply_edits(&cli, &mut session, catalog.as_ref()).unwrap_or_else(|e| {
        eprintln!("Error applying edit: {e}");
        process::exit(1);
    });

    // Only reachable with edits; the flag checks above exit otherwise.
    if let Some(out_path) = cli.output.as_ref() {
        let edited_bytes = session.to_bytes().unwrap_or_else(|e| {
            eprintln!("Error creating edited save bytes: {e}");
            process::exit(1);
        });
        fs::write(out_path, edited_bytes).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
        info!(path = %out_path.display(), "edited save written");
    }

    let exported = cli
        .export_team_slot
        .zip(cli.export_out.as_ref())
        .map(|(slot, path)| {
            let blob = session
                .export_team_member(slot, !cli.export_decrypted)
                .unwrap_or_else(|e| {
                    eprintln!("Error exporting team slot {slot}: {e}");
                    process::exit(1);
                });
            fs::write(path, blob).unwrap_or_else(|e| {
                eprintln!("Error writing {}: {e}", path.display());
                process::exit(1);
            });
            info!(slot, path = %path.display(), "team member exported");
            (slot, path)
        });

    if cli.json {
        let json = if fields.is_field_mode() {
            fields.selected_json(&session, &names).map(JsonValue::Object)
        } else {
            default_json(&session, &names).map(JsonValue::Object)
        };
        let json = json.unwrap_or_else(|e| {
            eprintln!("Error reading save data: {e}");
            process::exit(1);
        });
        let rendered = serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
        return;
    }

    if fields.is_field_mode() {
        let pairs = fields.selected_pairs(&session, &names).unwrap_or_else(|e| {
            eprintln!("Error reading save data: {e}");
            process::exit(1);
        });
        for (key, value) in pairs {
            println!("{key}={value}");
        }
        return;
    }

    if cli.output.is_some() || exported.is_some() {
        if let Some(out_path) = cli.output.as_ref() {
            println!("Wrote edited save to {}", out_path.display());
        }
        if let Some((slot, path)) = exported {
            println!("Exported team slot {slot} to {}", path.display());
        }
        return;
    }

    print_summary(&session, &names);
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

fn apply_edits(cli: &Cli, session: &mut Session, catalog: Option<&Catalog>) -> Result<(), String> {
    if let Some(money) = cli.set_money {
        session.set_money(money).map_err(|e| e.to_string())?;
    }
    if let Some(coins) = cli.set_coins {
        session.set_coins(coins).map_err(|e| e.to_string())?;
    }
    if let Some(name) = cli.set_trainer_name.as_deref() {
        session.set_trainer_name(name).map_err(|e| e.to_string())?;
    }

    for name in &cli.set_seen {
        session
            .set_seen(resolve_species(name, catalog)?)
            .map_err(|e| e.to_string())?;
    }
    for name in &cli.set_caught {
        session
            .set_caught(resolve_species(name, catalog)?)
            .map_err(|e| e.to_string())?;
    }
    for name in &cli.unset_caught {
        session
            .unset_caught(resolve_species(name, catalog)?)
            .map_err(|e| e.to_string())?;
    }
    for name in &cli.unset_seen {
        session
            .unset_seen(resolve_species(name, catalog)?)
            .map_err(|e| e.to_string())?;
    }

    if let Some(box_index) = cli.edit_box {
        if let Some(name) = cli.set_box_name.as_deref() {
            session
                .set_box_name(box_index, name)
                .map_err(|e| e.to_string())?;
        }
        if let (Some(slot), Some(species)) = (cli.edit_box_slot, cli.set_species.as_deref()) {
            session
                .set_box_species(box_index, slot, resolve_species(species, catalog)?)
                .map_err(|e| e.to_string())?;
        }
    }

    if let Some(slot) = cli.remove_team_slot {
        session.remove_creature(slot).map_err(|e| e.to_string())?;
    }

    if cli.clone_lead
        && session.clone_first_team_member().map_err(|e| e.to_string())? == InsertOutcome::TeamFull
    {
        eprintln!("Team is full; lead not cloned");
    }

    if let Some(species) = cli.add_creature.as_deref() {
        let builder = creature_builder(cli, session, species, catalog)?;
        let creature = builder.build().map_err(|e| e.to_string())?;
        match cli.team_slot {
            Some(slot) => {
                session
                    .set_creature(creature, slot)
                    .map_err(|e| e.to_string())?;
            }
            None => {
                let outcome = session.add_creature(creature).map_err(|e| e.to_string())?;
                if outcome == InsertOutcome::TeamFull {
                    eprintln!("Team is full; creature not added");
                }
            }
        }
    }

    Ok(())
}

fn creature_builder(
    cli: &Cli,
    session: &Session,
    species: &str,
    catalog: Option<&Catalog>,
) -> Result<CreatureBuilder, String> {
    let species = resolve_species(species, catalog)?;
    let mut builder = CreatureBuilder::new(session.game(), species).level(cli.level);
    if let Some(catalog) = catalog {
        builder = builder.with_catalog(catalog).map_err(|e| e.to_string())?;
    }

    if let Some(nickname) = cli.nickname.as_deref() {
        builder = builder.nickname(nickname);
    }
    if let Some(nature) = cli.nature.as_deref() {
        builder = builder.nature(resolve_nature(nature)?);
    }
    if let Some(ability) = cli.ability {
        builder = builder.ability(to_core_ability(ability));
    }
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    builder = builder.shiny(cli.shiny);
    if let Some(item) = cli.item.as_deref() {
        builder = builder.item(resolve_id(item, "item", |name| {
            catalog.and_then(|c| c.resolve_item(name))
        })?);
    }
    if let Some(ivs) = cli.ivs.as_deref() {
        builder = builder.ivs(six(ivs, "IVs")?);
    }
    if let Some(evs) = cli.evs.as_deref() {
        builder = builder.evs(six(evs, "EVs")?);
    }

    // Default to the save's own trainer as original owner.
    let snapshot = session.snapshot();
    let trainer_id = (u64::from(snapshot.secret_id) << 16) | u64::from(snapshot.public_id);
    builder = builder.trainer(
        cli.ot_name
            .clone()
            .unwrap_or_else(|| snapshot.trainer_name.trim_end().to_string()),
        cli.ot_id.unwrap_or(trainer_id),
        cli.ot_gender.map(to_core_gender).unwrap_or(snapshot.gender),
    );
    Ok(builder)
}

fn resolve_species(value: &str, catalog: Option<&Catalog>) -> Result<u16, String> {
    resolve_id(value, "species", |name| {
        catalog.and_then(|c| c.resolve_species(name))
    })
}

fn resolve_nature(value: &str) -> Result<u8, String> {
    if let Ok(id) = value.parse::<u8>() {
        return Ok(id);
    }
    stats::nature_by_name(value).ok_or_else(|| format!("unknown nature '{value}'"))
}

/// Numeric ids pass through; names need a catalog.
fn resolve_id(
    value: &str,
    kind: &str,
    lookup: impl Fn(&str) -> Option<u16>,
) -> Result<u16, String> {
    if let Ok(id) = value.parse::<u16>() {
        return Ok(id);
    }
    lookup(value).ok_or_else(|| format!("unknown {kind} '{value}' (pass --catalog or a numeric id)"))
}

fn six<T: Copy>(values: &[T], what: &str) -> Result<[T; 6], String> {
    <[T; 6]>::try_from(values).map_err(|_| format!("{what} need exactly 6 values"))
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

fn default_json(
    session: &Session,
    names: &Names<'_>,
) -> Result<JsonMap<String, JsonValue>, String> {
    let snapshot = session.snapshot();
    let mut out = match serde_json::to_value(snapshot) {
        Ok(JsonValue::Object(map)) => map,
        Ok(_) => JsonMap::new(),
        Err(e) => return Err(e.to_string()),
    };
    out.insert(
        "play_time".to_string(),
        JsonValue::String(format_play_time(session)),
    );
    out.insert("team".to_string(), team_to_json(session, names)?);
    Ok(out)
}

fn team_to_json(session: &Session, names: &Names<'_>) -> Result<JsonValue, String> {
    let team = session.team().map_err(|e| e.to_string())?;
    Ok(JsonValue::Array(
        team.iter().map(|view| creature_to_json(view, names)).collect(),
    ))
}

fn box_entries_to_json(entries: &[BoxEntry], names: &Names<'_>) -> JsonValue {
    JsonValue::Array(
        entries
            .iter()
            .map(|entry| {
                let mut m = JsonMap::new();
                m.insert("box".to_string(), JsonValue::from(entry.box_index));
                m.insert("slot".to_string(), JsonValue::from(entry.slot));
                m.insert(
                    "creature".to_string(),
                    creature_to_json(&entry.creature, names),
                );
                JsonValue::Object(m)
            })
            .collect(),
    )
}

fn creature_to_json(view: &CreatureView, names: &Names<'_>) -> JsonValue {
    let mut value = serde_json::to_value(view).unwrap_or(JsonValue::Null);
    if let JsonValue::Object(m) = &mut value
        && names.catalog.is_some()
    {
        m.insert(
            "species_name".to_string(),
            JsonValue::String(names.species(view.species)),
        );
        m.insert(
            "move_names".to_string(),
            JsonValue::Array(
                view.moves
                    .iter()
                    .filter(|&&id| id != 0)
                    .map(|&id| JsonValue::String(names.move_name(id)))
                    .collect(),
            ),
        );
    }
    value
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

fn print_summary(session: &Session, names: &Names<'_>) {
    let snapshot = session.snapshot();

    println!(
        "{} save (slot {:?}, save #{})",
        session.game().as_str(),
        snapshot.active_slot,
        snapshot.save_index
    );
    println!(
        "  Trainer: {:<10} Gender: {:<8} ID: {:05}",
        snapshot.trainer_name, snapshot.gender, snapshot.public_id
    );
    println!(
        "  Money: {:<12} Coins: {:<8} Time: {}",
        snapshot.money,
        snapshot.coins,
        format_play_time(session)
    );
    println!(
        "  Pokedex: {} seen, {} caught",
        snapshot.dex_seen, snapshot.dex_caught
    );

    println!();
    println!("  Team ({}/6)", snapshot.team_size);
    match session.team() {
        Ok(team) => {
            for (slot, view) in team.iter().enumerate() {
                println!("    {slot}. {}", names.describe(view));
            }
        }
        Err(e) => println!("    unavailable: {e}"),
    }

    let stored = session.all_box_creatures().map(|e| e.len()).unwrap_or(0);
    println!();
    println!(
        "  PC: {stored} stored across {} boxes (current box {})",
        session.box_count(),
        snapshot.current_box + 1
    );
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn parse_game_kind(value: &str) -> Result<GameKind, String> {
    match value.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
        "fr" | "firered" => Ok(GameKind::FireRed),
        "rr" | "radicalred" => Ok(GameKind::RadicalRed),
        _ => Err(format!(
            "invalid game value '{value}', expected one of: fr, rr, firered, radicalred"
        )),
    }
}

fn to_core_game(game: GameKind) -> CoreGame {
    match game {
        GameKind::FireRed => CoreGame::FireRed,
        GameKind::RadicalRed => CoreGame::RadicalRed,
    }
}

fn to_core_gender(gender: GenderArg) -> Gender {
    match gender {
        GenderArg::Male => Gender::Male,
        GenderArg::Female => Gender::Female,
    }
}

fn to_core_ability(ability: AbilityArg) -> AbilitySlot {
    match ability {
        AbilityArg::First => AbilitySlot::First,
        AbilityArg::Second => AbilitySlot::Second,
        AbilityArg::Hidden => AbilitySlot::Hidden,
    }
}

fn format_play_time(session: &Session) -> String {
    let time = session.snapshot().play_time;
    format!("{}:{:02}:{:02}", time.hours, time.minutes, time.seconds)
}
