use std::{num::NonZeroUsize, path::PathBuf};

use clap::Parser;
use cluster_r0::{
    grid_search::{find_critical_boundary, run_grid_search},
    parameters::{validate_inputs, ContextParametersExt, Params},
    r0_estimator::{estimate_r0_parallel, ContextR0EstimatorExt},
    reports::{init_estimate_report, record_estimate},
};
use ixa::{
    info, report::ContextReportExt, set_log_level, Context, ContextGlobalPropertiesExt,
    ContextRandomExt, IxaError, LevelFilter,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// path to the input file
    #[arg(short, long)]
    input_file: PathBuf,

    /// path to the output directory
    #[arg(short, long)]
    output_directory: PathBuf,

    /// cluster sizes to run; defaults to the size in the input file
    #[arg(short = 'c', long = "cluster-size")]
    cluster_sizes: Vec<usize>,

    /// number of worker threads for the headline estimate
    #[arg(short, long, default_value_t = NonZeroUsize::MIN)]
    threads: NonZeroUsize,

    /// log level (error, warn, info, debug, trace)
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

fn initialize(args: &Args) -> Result<Context, IxaError> {
    set_log_level(args.log_level);
    let mut context = Context::new();
    context.load_global_properties(&args.input_file)?;
    let &Params { seed, .. } = context.get_params();
    context.init_random(seed);
    context
        .report_options()
        .overwrite(true)
        .directory(args.output_directory.clone());
    Ok(context)
}

fn run_cluster(
    context: &mut Context,
    parameters: &Params,
    threads: NonZeroUsize,
) -> Result<(), IxaError> {
    validate_inputs(parameters)?;
    let estimate = if threads.get() > 1 {
        estimate_r0_parallel(parameters, threads.get())?
    } else {
        context.estimate_r0_with(parameters)?
    };
    info!(
        "cluster size = {}, neighbor infections = {:.4}, travel infections = {:.4}, R0 = {:.4}",
        parameters.cluster_size,
        estimate.neighbor_infections_mean,
        estimate.travel_infections_mean,
        estimate.r0
    );
    record_estimate(context, parameters, &estimate);

    if let Some(grid_search) = &parameters.grid_search {
        run_grid_search(context, parameters, grid_search)?;
    }
    if let Some(critical_boundary) = &parameters.critical_boundary {
        find_critical_boundary(context, parameters, critical_boundary)?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), IxaError> {
    let mut context = initialize(args)?;
    let base_parameters = context.get_params().clone();
    info!("{base_parameters:?}");

    let cluster_sizes = if args.cluster_sizes.is_empty() {
        vec![base_parameters.cluster_size]
    } else {
        args.cluster_sizes.clone()
    };

    for cluster_size in cluster_sizes {
        let parameters = Params {
            cluster_size,
            estimate_report_name: base_parameters
                .estimate_report_name
                .as_ref()
                .map(|name| format!("{name}_cluster_size{cluster_size}")),
            grid_search: base_parameters.grid_search.clone().map(|mut grid_search| {
                grid_search.report_name =
                    format!("{}_cluster_size{cluster_size}", grid_search.report_name);
                grid_search
            }),
            critical_boundary: base_parameters
                .critical_boundary
                .clone()
                .map(|mut critical_boundary| {
                    critical_boundary.report_name =
                        format!("{}_cluster_size{cluster_size}", critical_boundary.report_name);
                    critical_boundary
                }),
            ..base_parameters.clone()
        };
        init_estimate_report(&mut context, &parameters)?;
        run_cluster(&mut context, &parameters, args.threads)?;
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    run(&args).expect("Error running cluster R0 estimation.");
}
