// Sun Oct 18 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use ue_introspector::{
    config::Config,
    memory::{Address, MemoryReader, ProcessMemory},
    output::IntrospectionReport,
    runtime::{ConfigProfile, GameProfile, Session},
    symbol::{ImageSymbols, SymbolLookup},
    ui::{counted_bar, Banner},
    utils::{self, logging},
};

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Runtime introspection for ARM64 Unreal Engine games", long_about = None)]
struct Args {
    /// Target process id
    #[arg(short, long)]
    pid: i32,

    /// Game profile (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// On-disk copy of the game executable, for exported symbols
    #[arg(short, long)]
    binary: Option<PathBuf>,

    /// Dump the first N objects of GUObjectArray with their names
    #[arg(short, long)]
    names: Option<usize>,

    /// Resolve a single name id
    #[arg(long)]
    name_id: Option<i32>,

    /// Object whose vtable is searched for ProcessEvent (hex address)
    #[arg(long)]
    object: Option<String>,

    /// Same as --object, taking the object at this GUObjectArray index
    #[arg(long)]
    object_index: Option<i32>,

    /// Query the OS for every pointer check instead of the region cache
    #[arg(long)]
    no_cache: bool,

    /// -v for debug, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log level by name; overrides -v
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    no_banner: bool,

    #[arg(long)]
    no_progress: bool,

    /// Write the results as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    if std::env::var_os("RUST_LOG").is_some() && args.log_level.is_none() {
        logging::init_from_env();
    } else {
        logging::init_logger(args.verbose, args.log_level.as_deref(), true);
    }

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", "[-]".red(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    if !args.no_banner {
        Banner::new("ue-introspector")
            .with_subtitle("Unreal Engine runtime introspection")
            .with_version(env!("CARGO_PKG_VERSION"))
            .print();
        println!();
    }

    let start_time = Instant::now();

    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load profile {}", args.config.display()))?;
    let profile = ConfigProfile::new(config);

    println!("{} Attaching to pid {}", "[*]".blue(), args.pid);
    let process = ProcessMemory::attach(args.pid).with_context(|| format!("failed to attach to {}", args.pid))?;
    let reader: Arc<dyn MemoryReader> = Arc::new(process);

    let symbols = match &args.binary {
        Some(path) => {
            let base = profile.executable_base(&*reader);
            let symbols = ImageSymbols::load(path)
                .with_context(|| format!("failed to read symbols from {}", path.display()))?
                .with_runtime_base(base);
            println!("{} Loaded {} symbols from {}", "[+]".green(), symbols.len(), path.display());
            Some(symbols)
        }
        None => None,
    };

    let mut session = match Session::init(
        reader,
        &profile,
        symbols.as_ref().map(|s| s as &dyn SymbolLookup),
    ) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{} Initialization failed (status {}): {}", "[-]".red(), e.code(), e);
            std::process::exit(e.code());
        }
    };
    if args.no_cache {
        session.set_use_cache(false);
    }

    let handles = *session.handles();
    println!("{} Runtime globals:", "[+]".green());
    println!("    {:<16} {}", "Base", handles.base_address);
    println!("    {:<16} {}", "Names", handles.names_ptr);
    println!("    {:<16} {}", "GUObjectArray", handles.guobject_array);
    println!("    {:<16} {}", "ObjObjects", handles.obj_objects);
    println!("    {:<16} {}", "Objects", handles.objects);

    let mut report = IntrospectionReport::new(args.pid, handles);

    if let Some(id) = args.name_id {
        println!("{} Name {} = {:?}", "[+]".green(), id, session.resolve_name(id));
    }

    if let Some(count) = args.names {
        dump_objects(&session, count, !args.no_progress, &mut report);
    }

    let object = match (&args.object, args.object_index) {
        (Some(text), _) => match utils::parse_address(text) {
            Some(addr) => Some(addr),
            None => bail!("invalid object address '{}'", text),
        },
        (None, Some(index)) => Some(session.object_at(index)),
        (None, None) => None,
    };

    if let Some(object) = object {
        locate(&session, object, &mut report);
    }

    if let Some(path) = &args.output {
        report
            .write_json(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{} Report written to {}", "[+]".green(), path.display());
    }

    println!(
        "{} Done in {}",
        "[*]".blue(),
        utils::format_duration(start_time.elapsed())
    );
    Ok(())
}

fn dump_objects(session: &Session, count: usize, progress: bool, report: &mut IntrospectionReport) {
    let last = session.object_scan_limit(count);
    let pb = counted_bar(last as u64, "resolving object names", progress);
    for index in 0..last {
        pb.inc(1);
        let object = session.object_at(index);
        if object.is_null() {
            continue;
        }
        let name = session.object_name(object);
        if session.is_excluded(&name) {
            continue;
        }
        report.add_object(index, object, name);
    }
    pb.finish_and_clear();

    println!("{} {} live objects in the first {}", "[+]".green(), report.objects.len(), last);
    for record in &report.objects {
        println!("    {:>6} {} {}", record.index, record.address, record.name.cyan());
    }
}

fn locate(session: &Session, object: Address, report: &mut IntrospectionReport) {
    if object.is_null() {
        println!("{} No object to search", "[-]".red());
        return;
    }

    println!("{} Searching vtable of {}", "[*]".blue(), object);
    let found = session.locate_process_event(object);
    match &found {
        Some(found) => println!(
            "{} ProcessEvent at {} (slot {}, score {}, {:?})",
            "[+]".green(),
            found.address.to_string().yellow(),
            found.slot_index,
            found.score,
            found.method
        ),
        None => println!("{} ProcessEvent not found", "[-]".red()),
    }
    report.set_process_event(found);
}
