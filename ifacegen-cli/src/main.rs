use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ifacegen::{ClangFrontend, Collector, Diagnostics, DumpOptions, ExtractOptions};
use regex::Regex;

mod config;

use config::BatchConfig;

#[derive(Parser, Debug)]
#[command(name = "ifacegen")]
#[command(about = "Extract C++ class interfaces for Lean binding templates", long_about = None)]
struct Args {
    /// More output; repeat for debug logs. RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command that walks headers
#[derive(clap::Args, Debug)]
struct WalkArgs {
    /// Compiler asked for its system include directories
    #[arg(long, default_value = ifacegen::DEFAULT_COMPILER)]
    compiler: String,
    /// Additional include directory, treated like a system one
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<PathBuf>,
    /// Additional compiler argument
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    args: Vec<String>,
    /// Do not descend into included headers
    #[arg(long)]
    no_recursive: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract one class and write its schema
    Extract {
        /// Header declaring the class
        #[arg(value_name = "HEADER")]
        header: PathBuf,
        /// Native class name
        #[arg(short, long)]
        class: String,
        /// Target namespace of the generated bindings
        #[arg(short, long)]
        namespace: String,
        /// Member accessibility to extract
        #[arg(long, value_enum, default_value_t = AccessArg::Public)]
        access: AccessArg,
        /// Output file (defaults to <TargetName>.json in the output directory)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Output directory
        #[arg(long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
        #[command(flatten)]
        walk: WalkArgs,
    },

    /// Extract every class listed in a TOML batch file
    Batch {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// List the declarations found in a header
    Dump {
        #[arg(value_name = "HEADER")]
        header: PathBuf,
        /// Only list members of this class
        #[arg(short, long)]
        class: Option<String>,
        /// Regex removed from printed file paths
        #[arg(long, value_name = "REGEX")]
        path_root: Option<String>,
        #[command(flatten)]
        walk: WalkArgs,
    },

    /// Print the system include directories of a compiler
    IncludePaths {
        #[arg(long, default_value = ifacegen::DEFAULT_COMPILER)]
        compiler: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AccessArg {
    Public,
    Protected,
    Private,
}

impl From<AccessArg> for ifacegen::Access {
    fn from(access: AccessArg) -> Self {
        match access {
            AccessArg::Public => ifacegen::Access::Public,
            AccessArg::Protected => ifacegen::Access::Protected,
            AccessArg::Private => ifacegen::Access::Private,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(err) = real_main(args) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn real_main(args: Args) -> Result<()> {
    match args.command {
        Command::Extract {
            header,
            class,
            namespace,
            access,
            output,
            output_dir,
            walk,
        } => {
            let frontend = ClangFrontend::new()?;
            let mut collector = build_collector(
                &walk.compiler,
                walk.include,
                walk.args,
                !walk.no_recursive,
            )?;
            let options = ExtractOptions::builder(&class).access(access.into()).build();
            let mut diagnostics = Diagnostics::new();
            ifacegen::extract_class(&mut collector, &frontend, &header, &options, &mut diagnostics)
                .with_context(|| format!("extracting {class} from {}", header.display()))?;
            let written = write_class(
                &mut collector,
                &header,
                &options,
                &namespace,
                output,
                &output_dir,
            )?;
            println!("{}", written.display());
            report(&diagnostics);
            Ok(())
        }
        Command::Batch { config } => batch(&config),
        Command::Dump {
            header,
            class,
            path_root,
            walk,
        } => {
            let path_root = path_root
                .map(|re| Regex::new(&re).with_context(|| format!("invalid --path-root `{re}`")))
                .transpose()?;
            let frontend = ClangFrontend::new()?;
            let mut collector = build_collector(
                &walk.compiler,
                walk.include,
                walk.args,
                !walk.no_recursive,
            )?;
            let tu = collector.parse(&frontend, &header)?;
            let decls = collector.walk(&frontend, tu)?;
            let mut diagnostics = Diagnostics::new();
            let options = DumpOptions {
                path_root,
                target_class: class,
            };
            ifacegen::dump_declarations(&mut io::stdout().lock(), &decls, &options, &mut diagnostics)
                .context("writing declarations")?;
            report(&diagnostics);
            Ok(())
        }
        Command::IncludePaths { compiler } => {
            for path in ifacegen::discover_system_include_paths(&compiler)? {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn build_collector(
    compiler: &str,
    include: Vec<PathBuf>,
    args: Vec<String>,
    recursive: bool,
) -> Result<Collector> {
    let system_include_paths = ifacegen::discover_system_include_paths(compiler)?;
    log::info!(
        "{} system include directories from {compiler}",
        system_include_paths.len()
    );
    let builder = args.into_iter().fold(
        Collector::builder()
            .recursive(recursive)
            .system_include_paths(system_include_paths)
            .system_include_paths(include),
        |builder, arg| builder.compile_arg(arg),
    );
    Ok(builder.build())
}

/// Label an extracted class with `namespace` and write its schema.
///
/// Without `output` the schema goes to `<TargetName>.json` in `output_dir`. Returns the
/// written path.
fn write_class(
    collector: &mut Collector,
    header: &Path,
    options: &ExtractOptions,
    namespace: &str,
    output: Option<PathBuf>,
    output_dir: &Path,
) -> Result<PathBuf> {
    let class_interface = collector
        .class_interfaces_mut()
        .find(|i| i.class_type.native_name == options.target_class())
        .ok_or_else(|| {
            anyhow!(
                "no {:?} members of `{}` found in {}",
                options.access(),
                options.target_class(),
                header.display()
            )
        })?;
    class_interface.namespace = namespace.to_string();

    let path = output.unwrap_or_else(|| {
        output_dir.join(format!("{}.json", class_interface.class_type.target_name))
    });
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    ifacegen::write_schema(&path, class_interface)?;
    Ok(path)
}

fn batch(config_path: &Path) -> Result<()> {
    let config = BatchConfig::load(config_path)?;
    let frontend = ClangFrontend::new()?;
    let mut collector = build_collector(
        &config.compiler,
        config.include.clone(),
        config.args.clone(),
        config.recursive,
    )?;
    let mut diagnostics = Diagnostics::new();

    // A header is walked once; every class declared behind it comes from that walk
    for (header, classes) in config.classes_by_header() {
        let options: Vec<ExtractOptions> = classes
            .iter()
            .map(|class| ExtractOptions::builder(&class.name).build())
            .collect();
        ifacegen::extract_classes(&mut collector, &frontend, header, &options, &mut diagnostics)
            .with_context(|| format!("extracting from {}", header.display()))?;
        for (class, options) in classes.iter().zip(&options) {
            let written = write_class(
                &mut collector,
                header,
                options,
                &class.namespace,
                None,
                &config.output_dir,
            )?;
            println!("{}", written.display());
        }
    }
    report(&diagnostics);
    Ok(())
}

fn report(diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("{} warnings:", diagnostics.len());
    for line in diagnostics.summary() {
        eprintln!("  {line}");
    }
}
