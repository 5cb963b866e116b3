#![deny(unsafe_code)]
//! CLI binary for the fluidity line-field generator.
//!
//! Subcommands:
//! - `generate`: build a composition and print lines, curves or display lists as JSON
//! - `list`: print available noise kinds, sort policies and curve kinds
//! - `schema`: print the params schema

mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use fluidity_core::{
    Composition, ConfigOverrides, CurveKind, FluidityConfig, NoiseConfig, NoiseKindName,
    SortPolicy,
};
use serde_json::{json, Value};
use std::process;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "fluidity", about = "Noise-driven closed-curve line fields")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log pipeline progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a composition and print it as JSON.
    Generate {
        /// Noise seed.
        #[arg(long)]
        seed: Option<u32>,

        /// Noise kind (linear, circular).
        #[arg(long)]
        noise: Option<String>,

        /// Points per line.
        #[arg(long)]
        npoints: Option<usize>,

        /// Number of lines.
        #[arg(long)]
        nlines: Option<usize>,

        /// Sort policy (none, per_line, shared, first_line_only).
        #[arg(long)]
        sort: Option<String>,

        /// Curve kind (hobby, cubic).
        #[arg(long)]
        curve: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        istart: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        istep: Option<f64>,

        /// Circular noise period in lines.
        #[arg(long)]
        isteps: Option<usize>,

        #[arg(long, allow_negative_numbers = true)]
        jstart: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        jstep: Option<f64>,

        /// Hilbert grid exponent.
        #[arg(long)]
        resolution: Option<u32>,

        /// Base parameters as a JSON object; flags override them.
        #[arg(long, default_value = "{}")]
        params: String,

        /// What to print.
        #[arg(short, long, value_enum, default_value_t = Output::Dlists)]
        output: Output,
    },
    /// List noise kinds, sort policies and curve kinds.
    List,
    /// Print every params key with its type and default.
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    /// Ordered point lines.
    Lines,
    /// Bezier segments per line.
    Curves,
    /// Display lists per line.
    Dlists,
    /// Each point's path across lines.
    Tracks,
}

/// Collects the generate flags into overrides, resolving option names.
#[allow(clippy::too_many_arguments)]
fn flag_overrides(
    seed: Option<u32>,
    noise: Option<String>,
    npoints: Option<usize>,
    nlines: Option<usize>,
    sort: Option<String>,
    curve: Option<String>,
    istart: Option<f64>,
    istep: Option<f64>,
    isteps: Option<usize>,
    jstart: Option<f64>,
    jstep: Option<f64>,
    resolution: Option<u32>,
) -> Result<ConfigOverrides, CliError> {
    Ok(ConfigOverrides {
        noise: noise.as_deref().map(NoiseKindName::from_name).transpose()?,
        seed,
        istart,
        istep,
        isteps,
        jstart,
        jstep,
        npoints,
        nlines,
        sort: sort.as_deref().map(SortPolicy::from_name).transpose()?,
        curve: curve.as_deref().map(CurveKind::from_name).transpose()?,
        resolution,
    })
}

fn render_output(comp: &Composition, output: Output) -> Result<Value, CliError> {
    let data = match output {
        Output::Lines => serde_json::to_value(comp.lines())?,
        Output::Curves => serde_json::to_value(comp.curves())?,
        Output::Dlists => serde_json::to_value(comp.display_lists())?,
        Output::Tracks => serde_json::to_value(comp.point_tracks())?,
    };
    Ok(json!({
        "config": comp.config(),
        "bounds": comp.bounds(),
        "data": data,
    }))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let noise = NoiseConfig::list_names();
            let sorts = SortPolicy::list_names();
            let curves = CurveKind::list_names();
            if cli.json {
                let info = json!({
                    "noise": noise,
                    "sort": sorts,
                    "curve": curves,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Noise kinds:");
                println!("  {}", noise.join(", "));
                println!("Sort policies:");
                println!("  {}", sorts.join(", "));
                println!("Curve kinds:");
                println!("  {}", curves.join(", "));
            }
        }
        Command::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&FluidityConfig::param_schema())?
            );
        }
        Command::Generate {
            seed,
            noise,
            npoints,
            nlines,
            sort,
            curve,
            istart,
            istep,
            isteps,
            jstart,
            jstep,
            resolution,
            params,
            output,
        } => {
            let params: Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let base = FluidityConfig::from_json(&params)?;
            let overrides = flag_overrides(
                seed, noise, npoints, nlines, sort, curve, istart, istep, isteps, jstart, jstep,
                resolution,
            )?;
            let comp = Composition::new(base.derive(&overrides))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&render_output(&comp, output)?)?
            );
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_flags() -> Result<ConfigOverrides, CliError> {
        flag_overrides(
            None, None, None, None, None, None, None, None, None, None, None, None,
        )
    }

    #[test]
    fn empty_flags_override_nothing() {
        assert_eq!(no_flags().unwrap(), ConfigOverrides::new());
    }

    #[test]
    fn flags_resolve_option_names() {
        let o = flag_overrides(
            Some(5),
            Some("circular".into()),
            None,
            None,
            Some("shared".into()),
            Some("cubic".into()),
            None,
            None,
            Some(30),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(o.seed, Some(5));
        assert_eq!(o.noise, Some(NoiseKindName::Circular));
        assert_eq!(o.sort, Some(SortPolicy::Shared));
        assert_eq!(o.curve, Some(CurveKind::CubicSpline));
        assert_eq!(o.isteps, Some(30));
    }

    #[test]
    fn unknown_flag_name_is_input_error() {
        let err = flag_overrides(
            None,
            None,
            None,
            None,
            Some("zigzag".into()),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn output_wraps_config_and_data() {
        let config = FluidityConfig::default().derive(&ConfigOverrides::new().nlines(2).npoints(4));
        let comp = Composition::new(config).unwrap();
        let v = render_output(&comp, Output::Dlists).unwrap();
        assert_eq!(v["config"]["nlines"], 2);
        assert_eq!(v["data"].as_array().unwrap().len(), 2);
        assert_eq!(v["data"][0][0]["op"], "move_to");

        let tracks = render_output(&comp, Output::Tracks).unwrap();
        assert_eq!(tracks["data"].as_array().unwrap().len(), 4);
    }
}
