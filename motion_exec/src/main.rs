//! Motion executable entry point.
//!
//! # Architecture
//!
//! The executable runs one course script from start to finish:
//!
//!     - Start the session and logger
//!     - Load the motion and robot parameters
//!     - Build the motion controller on top of the robot's capabilities
//!     - Load the course script given on the command line
//!     - Execute each step in turn, archiving a record of every step
//!
//! The robot's capabilities are currently provided by the simulated robot,
//! configured by `sim.toml`. A hardware backend only has to implement the
//! traits in `motion_lib::hal`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::env;
use std::path::Path;
use color_eyre::{Report, eyre::{WrapErr, eyre}};

// Internal
use motion_lib::{
    course::{Course, CourseError},
    motion_ctrl::{MotionCtrl, Params},
    sim::{SimParams, SimWorld},
};
use util::{
    host,
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "motion_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger, poll traces are only wanted when debugging the
    // stopping logic
    logger_init(
        LevelFilter::Trace,
        &[("motion_lib::motion_ctrl::poll", LevelFilter::Debug)],
        &session
    ).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Motion Executable\n");
    info!("Running on: {}", host::get_host_desc());
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: Params = util::params::load(
        "motion.toml"
    ).wrap_err("Could not load motion params")?;

    let sim_params: SimParams = util::params::load(
        "sim.toml"
    ).wrap_err("Could not load sim params")?;

    sim_params.are_valid().wrap_err("Invalid sim params")?;

    info!("Exec parameters loaded");

    // ---- LOAD COURSE SCRIPT ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let script_arg = script_path_arg(&args)?;

    info!("Loading course script from \"{}\"", script_arg);

    let course = Course::load(script_arg).wrap_err("Failed to load the course script")?;

    info!(
        "Loaded course {:?} contains {} steps\n",
        course.script_path().unwrap_or_else(|| Path::new(script_arg)),
        course.num_steps()
    );

    // ---- INITIALISE MOTION CONTROL ----

    let world = SimWorld::new(sim_params);

    let mut motion_ctrl = MotionCtrl::new(
        params,
        world.motors(),
        world.encoders(),
        world.light_sensor(),
        world.clock()
    ).wrap_err("Failed to initialise MotionCtrl")?;

    info!("MotionCtrl init complete\n");

    let mut archiver = Archiver::from_path(&session, "motion/course_steps.csv")
        .wrap_err("Failed to create the course archive")?;

    // ---- RUN COURSE ----

    info!("Beginning course");

    let result = course.run(&mut motion_ctrl, |record| {
        if let Err(e) = archiver.serialise(record) {
            warn!("Could not archive step {}: {}", record.index, e);
        }
    });

    // Whatever happened the wheels must be at rest before exiting
    motion_ctrl.stop_all();

    match result {
        Ok(records) => {
            let timed_out = records
                .iter()
                .filter(|r| r.outcome.map_or(false, |o| !o.is_completed()))
                .count();

            if timed_out > 0 {
                warn!("{} step(s) ended on their failsafe", timed_out);
            }

            info!(
                "Course finished in {:.03} s (simulated)",
                world.time_s()
            );
        },
        Err(CourseError::StepFailed(index, line, e)) => {
            return Err(e).wrap_err(format!(
                "Course aborted at step {} (line {})", index + 1, line
            ));
        },
        Err(e) => return Err(e).wrap_err("Course failed")
    }

    info!("End of execution");

    Ok(())
}

/// Get the course script path from the command line arguments, which must be
/// the only argument given.
fn script_path_arg(args: &[String]) -> Result<&str, Report> {
    match args {
        [_, script] => Ok(script.as_str()),
        _ => Err(eyre!(
            "Expected the path to a course script as the only argument, found {} arguments",
            args.len().saturating_sub(1)
        ))
    }
}
