//! Command-line front end. Parsing is hand-rolled: positional creature names
//! after the subcommand, then `--flag value` options in any order. Usage
//! errors exit 2, lookup and I/O errors exit 1.

use std::path::PathBuf;

use crate::combat::{narrate, serialize_events_json, Combatant, Team};
use crate::data::{armory, bestiary, resolve_creature, resolve_item, LookupError};
use crate::parallel::WorkerPool;
use crate::report::{render, write_output, Report, ReportFormat};
use crate::sim::{run_trials, traced_trial, ScenarioConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Duel,
    Group,
    Variation,
    Matrix,
    List,
    Info,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("duel") => Some(Command::Duel),
        Some("group") => Some(Command::Group),
        Some("variation") => Some(Command::Variation),
        Some("matrix") => Some(Command::Matrix),
        Some("list") => Some(Command::List),
        Some("info") => Some(Command::Info),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Duel) => handle_duel(args),
        Some(Command::Group) => handle_group(args),
        Some(Command::Variation) => handle_variation(args),
        Some(Command::Matrix) => handle_matrix(args),
        Some(Command::List) => handle_list(args),
        Some(Command::Info) => handle_info(args),
        None => {
            eprintln!("usage: skirmish <duel|group|variation|matrix|list|info> [options]");
            2
        }
    }
}

#[derive(Debug, Clone)]
struct Options {
    positional: Vec<String>,
    config: ScenarioConfig,
    equip_a: Vec<String>,
    equip_b: Vec<String>,
    variations: Vec<String>,
    format: ReportFormat,
    outfile: Option<PathBuf>,
    events_file: Option<PathBuf>,
    compact: bool,
    verbose: bool,
    pool: WorkerPool,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        positional: Vec::new(),
        config: ScenarioConfig::default(),
        equip_a: Vec::new(),
        equip_b: Vec::new(),
        variations: Vec::new(),
        format: ReportFormat::Console,
        outfile: None,
        events_file: None,
        compact: false,
        verbose: false,
        pool: WorkerPool::default_workers(),
    };
    let mut i = 2;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--iterations" => {
                options.config.iterations = parse_value(args.get(i + 1), arg)?;
                i += 2;
            }
            "--seed" => {
                options.config.seed = parse_value(args.get(i + 1), arg)?;
                i += 2;
            }
            "--turn-cap" => {
                options.config.turn_cap = parse_value(args.get(i + 1), arg)?;
                i += 2;
            }
            "--workers" => {
                options.pool = WorkerPool::with_workers(parse_value(args.get(i + 1), arg)?);
                i += 2;
            }
            "--equip-a" => {
                options.equip_a.extend(parse_list(args.get(i + 1), arg)?);
                i += 2;
            }
            "--equip-b" => {
                options.equip_b.extend(parse_list(args.get(i + 1), arg)?);
                i += 2;
            }
            "--var" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{arg} requires a value"))?;
                options.variations.push(value.clone());
                i += 2;
            }
            "--output" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{arg} requires a value"))?;
                options.format = value.parse().map_err(|e| format!("{e}"))?;
                i += 2;
            }
            "--outfile" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{arg} requires a value"))?;
                options.outfile = Some(PathBuf::from(value));
                i += 2;
            }
            "--events-file" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| format!("{arg} requires a value"))?;
                options.events_file = Some(PathBuf::from(value));
                i += 2;
            }
            "--compact" => {
                options.compact = true;
                i += 1;
            }
            "--verbose" => {
                options.verbose = true;
                i += 1;
            }
            _ if arg.starts_with("--") => {
                return Err(format!("unknown option '{arg}'"));
            }
            _ => {
                options.positional.push(args[i].clone());
                i += 1;
            }
        }
    }
    Ok(options)
}

fn parse_value<T: std::str::FromStr>(raw: Option<&String>, name: &str) -> Result<T, String> {
    let value = raw.ok_or_else(|| format!("{name} requires a value"))?;
    value
        .parse()
        .map_err(|_| format!("invalid {name} '{value}'"))
}

fn parse_list(raw: Option<&String>, name: &str) -> Result<Vec<String>, String> {
    let value = raw.ok_or_else(|| format!("{name} requires a value"))?;
    Ok(value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect())
}

fn equipped(creature: &str, team: Team, items: &[String]) -> Result<Combatant, LookupError> {
    let mut combatant = resolve_creature(creature)?.spawn(team);
    for item in items {
        resolve_item(item)?.equip(&mut combatant);
    }
    Ok(combatant)
}

/// "goblin:3,wolf:1" into spawned, numbered combatants for one team.
fn parse_group(spec: &str, team: Team, items: &[String]) -> Result<Vec<Combatant>, String> {
    let mut roster = Vec::new();
    for part in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, count) = match part.split_once(':') {
            Some((name, count)) => {
                let count: usize = count
                    .parse()
                    .map_err(|_| format!("invalid count in '{part}'"))?;
                (name.trim(), count)
            }
            None => (part, 1),
        };
        if count == 0 {
            return Err(format!("zero count in '{part}'"));
        }
        let definition = resolve_creature(name).map_err(|e| e.to_string())?;
        for ordinal in 0..count {
            let mut combatant = definition.spawn(team);
            if count > 1 {
                combatant.name = format!("{} {}", combatant.name, ordinal + 1);
            }
            for item in items {
                resolve_item(item).map_err(|e| e.to_string())?.equip(&mut combatant);
            }
            roster.push(combatant);
        }
    }
    if roster.is_empty() {
        return Err(format!("empty group spec '{spec}'"));
    }
    Ok(roster)
}

fn run_scenarios(scenarios: &[(String, Vec<Combatant>)], options: &Options) -> i32 {
    if options.verbose || options.events_file.is_some() {
        if let Some((name, roster)) = scenarios.first() {
            let (_, events) = traced_trial(roster, &options.config, 0);
            if options.verbose {
                println!("--- sample trial: {name} ---");
                for event in &events {
                    println!("{}", narrate(event));
                }
                println!();
            }
            if let Some(path) = &options.events_file {
                let payload = match serialize_events_json(&events) {
                    Ok(payload) => payload,
                    Err(err) => {
                        eprintln!("failed to serialize events: {err}");
                        return 1;
                    }
                };
                if let Err(err) = std::fs::write(path, payload) {
                    eprintln!("failed to write events file: {err}");
                    return 1;
                }
            }
        }
    }
    let reports: Vec<Report> = scenarios
        .iter()
        .map(|(name, roster)| {
            let tally = run_trials(roster, &options.config, &options.pool);
            Report::new(name.clone(), &options.config, tally.summarize())
        })
        .collect();
    let rendered = match render(&reports, options.format, options.compact) {
        Ok(rendered) => rendered,
        Err(err) => {
            eprintln!("failed to render report: {err}");
            return 1;
        }
    };
    if let Err(err) = write_output(&rendered, options.outfile.as_deref()) {
        eprintln!("failed to write output: {err}");
        return 1;
    }
    0
}

fn handle_duel(args: &[String]) -> i32 {
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(err) => return usage_error(&err, "skirmish duel <creatureA> <creatureB> [options]"),
    };
    let [a, b] = options.positional.as_slice() else {
        return usage_error(
            "expected exactly two creatures",
            "skirmish duel <creatureA> <creatureB> [options]",
        );
    };
    let roster = match build_duel_roster(a, b, &options.equip_a, &options.equip_b) {
        Ok(roster) => roster,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let scenario = format!("{a} vs {b}");
    run_scenarios(&[(scenario, roster)], &options)
}

fn build_duel_roster(
    a: &str,
    b: &str,
    equip_a: &[String],
    equip_b: &[String],
) -> Result<Vec<Combatant>, LookupError> {
    Ok(vec![
        equipped(a, Team::A, equip_a)?,
        equipped(b, Team::B, equip_b)?,
    ])
}

fn handle_group(args: &[String]) -> i32 {
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(err) => return usage_error(&err, "skirmish group <specA> <specB> [options]"),
    };
    let [spec_a, spec_b] = options.positional.as_slice() else {
        return usage_error(
            "expected exactly two group specs (e.g. 'goblin:3,wolf:1')",
            "skirmish group <specA> <specB> [options]",
        );
    };
    let mut roster = match parse_group(spec_a, Team::A, &options.equip_a) {
        Ok(roster) => roster,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    match parse_group(spec_b, Team::B, &options.equip_b) {
        Ok(mut team_b) => roster.append(&mut team_b),
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    }
    let scenario = format!("{spec_a} vs {spec_b}");
    run_scenarios(&[(scenario, roster)], &options)
}

/// One named loadout per `--var "name:item1,item2"`. A value without a colon
/// is shorthand for a single item named after itself.
fn parse_variation(spec: &str) -> (String, Vec<String>) {
    match spec.split_once(':') {
        Some((name, items)) => (
            name.trim().to_string(),
            items
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        None => (spec.trim().to_string(), vec![spec.trim().to_string()]),
    }
}

/// Baseline duel plus one extra scenario per `--var`, equipping team A.
fn handle_variation(args: &[String]) -> i32 {
    const USAGE: &str =
        "skirmish variation <creatureA> <creatureB> --var \"name:item1,item2\" [options]";
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(err) => return usage_error(&err, USAGE),
    };
    let [a, b] = options.positional.as_slice() else {
        return usage_error("expected exactly two creatures", USAGE);
    };
    if options.variations.is_empty() {
        return usage_error("variation needs at least one --var", USAGE);
    }
    let mut scenarios = Vec::new();
    match build_duel_roster(a, b, &options.equip_a, &options.equip_b) {
        Ok(roster) => scenarios.push((format!("{a} vs {b}"), roster)),
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    }
    for spec in &options.variations {
        let (label, items) = parse_variation(spec);
        let mut equip_a = options.equip_a.clone();
        equip_a.extend(items);
        match build_duel_roster(a, b, &equip_a, &options.equip_b) {
            Ok(roster) => scenarios.push((format!("{a} ({label}) vs {b}"), roster)),
            Err(err) => {
                eprintln!("{err}");
                return 1;
            }
        }
    }
    run_scenarios(&scenarios, &options)
}

/// Round-robin: every unordered pair duels once. With no creatures named,
/// the whole bestiary enters.
fn handle_matrix(args: &[String]) -> i32 {
    const USAGE: &str = "skirmish matrix [<creature> <creature> ...] [options]";
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(err) => return usage_error(&err, USAGE),
    };
    let contenders: Vec<String> = if options.positional.is_empty() {
        bestiary().into_iter().map(|c| c.id).collect()
    } else if options.positional.len() >= 2 {
        options.positional.clone()
    } else {
        return usage_error("matrix needs zero or at least two creatures", USAGE);
    };
    let mut scenarios = Vec::new();
    for (i, a) in contenders.iter().enumerate() {
        for b in &contenders[i + 1..] {
            match build_duel_roster(a, b, &options.equip_a, &options.equip_b) {
                Ok(roster) => scenarios.push((format!("{a} vs {b}"), roster)),
                Err(err) => {
                    eprintln!("{err}");
                    return 1;
                }
            }
        }
    }
    run_scenarios(&scenarios, &options)
}

fn handle_list(args: &[String]) -> i32 {
    const USAGE: &str = "skirmish list [creatures|items] [--output console|json]";
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(err) => return usage_error(&err, USAGE),
    };
    let (show_creatures, show_items) = match options.positional.first().map(String::as_str) {
        None => (true, true),
        Some("creatures") => (true, false),
        Some("items") => (false, true),
        Some(other) => return usage_error(&format!("unknown catalog '{other}'"), USAGE),
    };
    if options.format == ReportFormat::Csv {
        return usage_error("list renders as console or json", USAGE);
    }
    let creatures = bestiary();
    let items = armory();
    if options.format == ReportFormat::Json {
        let payload = match (show_creatures, show_items) {
            (true, true) => serde_json::json!({ "creatures": creatures, "items": items }),
            (true, false) => serde_json::json!({ "creatures": creatures }),
            _ => serde_json::json!({ "items": items }),
        };
        return match serde_json::to_string_pretty(&payload) {
            Ok(rendered) => {
                println!("{rendered}");
                0
            }
            Err(err) => {
                eprintln!("failed to serialize catalog: {err}");
                1
            }
        };
    }
    if show_creatures {
        println!("creatures:");
        for creature in &creatures {
            println!(
                "  {:<16} threat {:<2} hp {:<3} armor {:<2} speed {}",
                creature.id, creature.threat, creature.max_health, creature.armor, creature.speed
            );
        }
    }
    if show_items {
        println!("items:");
        for item in &items {
            println!("  {:<16} {:?}", item.id, item.kind);
        }
    }
    0
}

fn handle_info(args: &[String]) -> i32 {
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(err) => return usage_error(&err, "skirmish info <creature-or-item>"),
    };
    let [query] = options.positional.as_slice() else {
        return usage_error("expected one name", "skirmish info <creature-or-item>");
    };
    let payload = match resolve_creature(query) {
        Ok(creature) => serde_json::to_string_pretty(&creature),
        Err(_) => match resolve_item(query) {
            Ok(item) => serde_json::to_string_pretty(&item),
            Err(_) => {
                eprintln!("'{query}' not found in the bestiary or armory");
                return 1;
            }
        },
    };
    match payload {
        Ok(rendered) => {
            println!("{rendered}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize definition: {err}");
            1
        }
    }
}

fn usage_error(message: &str, usage: &str) -> i32 {
    eprintln!("{message}");
    eprintln!("usage: {usage}");
    2
}
