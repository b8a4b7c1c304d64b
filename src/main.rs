use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{arg, value_parser, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use tsp_meta::instance::Instance;
use tsp_meta::run::{write_tour_file, Algorithm, OutputMode, RunConfig, Runner};
use tsp_meta::tabu::TenurePolicy;
use tsp_meta::TspError;

fn cli() -> Command {
    Command::new("tsp")
        .about("Traveling Salesman Problem solver")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            arg!(-f --file <PATH> "Instance in TSPLIB format")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with("nodes"),
        )
        .arg(
            arg!(nodes: -n <N> "Solve a random instance with N uniformly placed nodes")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--alg <NAME> "Algorithm to run, see --all-algs").default_value("GREEDY"))
        .arg(
            arg!(-t --time <SECONDS> "Time limit in seconds")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true),
        )
        .arg(
            arg!(--seed <N> "Seed for random instances and randomized algorithms")
                .default_value("0")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(k: -k <K> "Size of each node's nearest-neighbor candidate list [default: 10]")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            arg!(--iterations <N> "Iteration budget of GREEDY_ITER, TABU_SEARCH and VNS")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            arg!(--"tenure-policy" <POLICY> "Tabu tenure: fixed:<T>, size, random or linear")
                .default_value("linear"),
        )
        .arg(
            arg!(--start <NODE> "Start node of GREEDY and 2OPT_GREEDY")
                .default_value("0")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--"to-file" "Also write the tour (and iteration history) to files"))
        .arg(
            arg!(--"out-dir" <DIR> "Directory for --to-file output")
                .default_value("results")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(-q --quiet "Only print the result line").conflicts_with("verbose"))
        .arg(arg!(-v --verbose ... "Log progress to stderr (-vv for debug, -vvv for trace)"))
        .arg(arg!(--"all-algs" "Print the available algorithms and exit"))
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(&matches);

    if let Err(e) = run(&matches) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(matches: &ArgMatches) {
    let verbosity = matches.get_count("verbose");
    let level = if matches.get_flag("quiet") {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = if verbosity == 0 && !matches.get_flag("quiet") {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    if matches.get_flag("all-algs") {
        for alg in Algorithm::ALL {
            println!("{alg}");
        }
        return Ok(());
    }

    let config = run_config(matches)?;
    config.validate()?;
    let instance = load_instance(matches, config.seed)?;

    let report = Runner::run(&instance, &config)?;
    if let OutputMode::File { dir } = &config.output {
        write_tour_file(&report, &instance, dir)?;
    }
    println!("{}", report.summary_line());
    Ok(())
}

fn run_config(matches: &ArgMatches) -> Result<RunConfig> {
    let algorithm: Algorithm = matches
        .get_one::<String>("alg")
        .map(String::as_str)
        .unwrap_or("GREEDY")
        .parse()?;
    let tenure: TenurePolicy = matches
        .get_one::<String>("tenure-policy")
        .map(String::as_str)
        .unwrap_or("linear")
        .parse()?;

    let mut config = RunConfig::new(algorithm)
        .with_tenure_policy(tenure)
        .with_seed(matches.get_one::<u64>("seed").copied().unwrap_or(0))
        .with_start_node(matches.get_one::<usize>("start").copied().unwrap_or(0));

    if let Some(&seconds) = matches.get_one::<f64>("time") {
        config = config.with_time_limit(seconds);
    }
    if let Some(&k) = matches.get_one::<i64>("k") {
        config = config.with_neighbor_bound(positive("k", k)?);
    }
    if let Some(&n) = matches.get_one::<i64>("iterations") {
        config = config.with_max_iterations(positive("iterations", n)?);
    }
    if matches.get_flag("to-file") {
        let dir = matches
            .get_one::<PathBuf>("out-dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("results"));
        config = config.with_output(OutputMode::File { dir });
    }
    Ok(config)
}

fn positive(name: &str, value: i64) -> Result<usize, TspError> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| TspError::Config(format!("{name} must be positive, got {value}")))
}

fn load_instance(matches: &ArgMatches, seed: u64) -> Result<Instance> {
    if let Some(path) = matches.get_one::<PathBuf>("file") {
        tracing::info!(path = %path.display(), "loading instance");
        return Ok(Instance::from_file(path)?);
    }
    if let Some(&n) = matches.get_one::<usize>("nodes") {
        tracing::info!(n, seed, "generating random instance");
        return Ok(Instance::random(n, seed)?);
    }
    Err(anyhow!("no instance given: pass --file <PATH> or -n <N>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        cli().try_get_matches_from(args).unwrap()
    }

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let config = run_config(&parse(&["tsp", "-n", "10"])).unwrap();
        assert_eq!(config.algorithm, Algorithm::Greedy);
        assert_eq!(config.seed, 0);
        assert_eq!(config.tenure, TenurePolicy::Linear);
        assert_eq!(config.output, OutputMode::Stdout);
        assert!(config.time_limit.is_none());
    }

    #[test]
    fn test_full_command_line() {
        let matches = parse(&[
            "tsp",
            "-f",
            "a280.tsp",
            "--alg",
            "TABU_SEARCH",
            "-t",
            "1.5",
            "--seed",
            "9",
            "-k",
            "12",
            "--iterations",
            "300",
            "--tenure-policy",
            "fixed:7",
            "--to-file",
            "--out-dir",
            "out",
            "-vv",
        ]);
        let config = run_config(&matches).unwrap();
        assert_eq!(config.algorithm, Algorithm::TabuSearch);
        assert_eq!(config.time_limit, Some(1.5));
        assert_eq!(config.seed, 9);
        assert_eq!(config.neighbor_bound, Some(12));
        assert_eq!(config.max_iterations, Some(300));
        assert_eq!(config.tenure, TenurePolicy::Fixed(7));
        assert_eq!(
            config.output,
            OutputMode::File {
                dir: PathBuf::from("out")
            }
        );
        assert_eq!(matches.get_count("verbose"), 2);
    }

    #[test]
    fn test_non_positive_k_is_config_error() {
        for k in ["0", "-3"] {
            let err = run_config(&parse(&["tsp", "-n", "10", "-k", k])).unwrap_err();
            assert!(matches!(err.downcast_ref::<TspError>(), Some(TspError::Config(_))));
        }
    }

    #[test]
    fn test_unknown_algorithm_is_config_error() {
        let err = run_config(&parse(&["tsp", "-n", "10", "--alg", "ANTS"])).unwrap_err();
        assert!(matches!(err.downcast_ref::<TspError>(), Some(TspError::Config(_))));
    }

    #[test]
    fn test_file_and_nodes_conflict() {
        assert!(cli()
            .try_get_matches_from(["tsp", "-f", "x.tsp", "-n", "5"])
            .is_err());
    }

    #[test]
    fn test_missing_instance() {
        let matches = parse(&["tsp"]);
        assert!(load_instance(&matches, 0).is_err());
    }
}
