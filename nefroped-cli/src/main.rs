use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{ArgAction, Args, Parser, Subcommand};
use nefroped_core::{
    classify_bp, resolve_bp_limits, Admission, Age, BloodPressure, DosingRegimen, PatientId,
    PatientProfile, Sex, TimeSlot, VitalObservation, VitalReading, WardConfig,
};
use nefroped_report::{build_ward_report, build_ward_report_str, render_text, WardReport};
use nefroped_store::Store;

#[derive(Parser, Debug)]
#[command(
    name = "nefroped",
    about = "Pediatric nephrology ward rounds: admission calculations, vital signs and reports."
)]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "NEFROPED_DB", default_value = "nefroped.db", global = true)]
    db: PathBuf,

    /// Ward configuration (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Admit a patient and store the derived doses and filtration rate.
    Register(RegisterArgs),
    /// Record one round of vital signs.
    Observe(ObserveArgs),
    /// List admitted patients.
    Patients,
    /// Ward report for the first patient whose name contains NAME.
    History {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Ward report from a JSON document, without the database.
    Report {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Blood-pressure limits and stage for a single reading.
    Bp(BpArgs),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    bed: String,
    /// Admission date (YYYY-MM-DD), today when omitted.
    #[arg(long)]
    admitted: Option<NaiveDate>,
    #[arg(long)]
    years: u32,
    #[arg(long, default_value_t = 0)]
    months: u32,
    #[arg(long, default_value_t = 0)]
    days: u32,
    /// M/F or Masculino/Feminino.
    #[arg(long)]
    sex: String,
    /// Born preterm (only used under 12 months).
    #[arg(long)]
    preterm: bool,
    /// Dry weight, kg.
    #[arg(long)]
    weight: f64,
    /// Height, cm.
    #[arg(long)]
    height: f64,
    /// Serum creatinine, mg/dL.
    #[arg(long)]
    creatinine: f64,
    /// Overrides the configured regimen: body_surface_area | weight_based.
    #[arg(long, value_parser = parse_regimen)]
    regimen: Option<DosingRegimen>,
    /// Oral solution strength, mg/mL.
    #[arg(long)]
    concentration: Option<f64>,
}

#[derive(Args, Debug)]
struct ObserveArgs {
    #[arg(long)]
    patient: i64,
    /// Round date (YYYY-MM-DD), today when omitted.
    #[arg(long)]
    date: Option<NaiveDate>,
    /// 08:00, 14:00, 20:00 or Extra.
    #[arg(long, value_parser = parse_slot)]
    slot: TimeSlot,
    /// Fasting weight, kg.
    #[arg(long)]
    weight: f64,
    /// Blood pressure as systolic/diastolic, e.g. 110/70.
    #[arg(long)]
    bp: BloodPressure,
    #[arg(long)]
    hr: u16,
    #[arg(long)]
    rr: u16,
    #[arg(long)]
    temp: f64,
    /// 24-hour urine volume, mL.
    #[arg(long, default_value_t = 0.0)]
    urine: f64,
}

#[derive(Args, Debug)]
struct BpArgs {
    #[arg(long)]
    sex: String,
    /// Age in completed years.
    #[arg(long)]
    age: u32,
    /// Height, cm.
    #[arg(long)]
    height: f64,
    #[arg(long)]
    reading: BloodPressure,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Register(args) => register(&cli.db, &config, args),
        Command::Observe(args) => observe(&cli.db, args),
        Command::Patients => list_patients(&cli.db),
        Command::History { name, json } => history(&cli.db, &config, &name, json),
        Command::Report { input, json } => {
            let data = std::fs::read_to_string(&input)
                .with_context(|| format!("could not read {}", input.display()))?;
            let report = build_ward_report_str(&data, &config)
                .with_context(|| format!("invalid report document {}", input.display()))?;
            print_report(&report, json)
        }
        Command::Bp(args) => bp(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<WardConfig> {
    let Some(path) = path else {
        return Ok(WardConfig::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config {}", path.display()))?;
    let config = serde_json::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    log::info!("loaded ward config from {}", path.display());
    Ok(config)
}

fn open_store(path: &Path) -> anyhow::Result<Store> {
    Store::open(path).with_context(|| format!("could not open database {}", path.display()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn register(db: &Path, config: &WardConfig, args: RegisterArgs) -> anyhow::Result<()> {
    let mut dosing = config.dosing;
    if let Some(regimen) = args.regimen {
        dosing.regimen = regimen;
    }
    if args.concentration.is_some() {
        dosing.concentration_mg_per_ml = args.concentration;
    }

    if args.name.trim().is_empty() {
        bail!("patient name is required");
    }

    let admission = Admission {
        name: args.name,
        bed: args.bed,
        admitted_on: args.admitted.unwrap_or_else(today),
        age: Age::new(args.years, args.months, args.days),
        sex: Sex::normalize(&args.sex),
        preterm: args.preterm,
        dry_weight_kg: args.weight,
        height_cm: args.height,
        creatinine_mg_dl: args.creatinine,
    };
    let profile =
        PatientProfile::admit(&admission, &dosing).context("admission values rejected")?;

    let store = open_store(db)?;
    let id = store
        .insert_patient(&profile)
        .context("could not save patient")?;

    println!("Patient {} registered (id {id}).", profile.name);
    print_profile(&profile);
    Ok(())
}

fn print_profile(profile: &PatientProfile) {
    let doses = &profile.doses;
    println!(
        "K: {} ({}) | SC: {:.2} m² | TFGe: {:.1} mL/min/1.73m²",
        profile.k,
        profile.category.label(),
        profile.body_surface_area_m2,
        profile.filtration_rate
    );
    println!(
        "Corticoterapia ({}): ataque {:.1} mg/dia | manutenção {:.1} mg (D.A.)",
        doses.regimen.as_str(),
        doses.attack_dose_mg,
        doses.maintenance_dose_mg
    );
    if let (Some(attack), Some(maintenance)) = (doses.attack_volume_ml, doses.maintenance_volume_ml)
    {
        println!("Volumes: ataque {attack:.1} mL | manutenção {maintenance:.1} mL");
    }
    println!(
        "Edema: albumina 20% {:.1} mL | furosemida IV {:.1} mg",
        doses.albumin_volume_ml, doses.diuretic_dose_mg
    );
}

impl ObserveArgs {
    /// Validated reading; stored rounds are never edited.
    fn reading(&self) -> anyhow::Result<VitalReading> {
        let reading = VitalReading {
            observed_on: self.date.unwrap_or_else(today),
            slot: self.slot,
            weight_kg: self.weight,
            blood_pressure: self.bp,
            heart_rate: self.hr,
            respiratory_rate: self.rr,
            temperature_c: self.temp,
            urine_24h_ml: self.urine,
        };
        reading.validate().context("round values rejected")?;
        Ok(reading)
    }
}

fn observe(db: &Path, args: ObserveArgs) -> anyhow::Result<()> {
    let reading = args.reading()?;
    let store = open_store(db)?;
    let id = PatientId(args.patient);
    let patient = store
        .get_patient(id)
        .context("could not load patient")?
        .with_context(|| format!("no patient with id {id}"))?;

    let observation = VitalObservation::record(id, &patient, reading);
    store
        .insert_observation(&observation)
        .context("could not save observation")?;

    println!(
        "{} {} {}: PA {} -> {}",
        patient.name,
        observation.reading.observed_on,
        observation.reading.slot,
        observation.reading.blood_pressure,
        observation.bp_stage.label()
    );
    Ok(())
}

fn list_patients(db: &Path) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let entries = store.list_patients().context("could not list patients")?;
    if entries.is_empty() {
        println!("No patients registered.");
    }
    for entry in entries {
        println!("{:>4}  {}  (leito {})", entry.id.0, entry.name, entry.bed);
    }
    Ok(())
}

fn history(db: &Path, config: &WardConfig, name: &str, json: bool) -> anyhow::Result<()> {
    let store = open_store(db)?;
    let Some((id, patient)) = store
        .search_patients(name)
        .context("patient search failed")?
        .into_iter()
        .next()
    else {
        bail!("no patient matches {name:?}");
    };
    let observations = store
        .observations_for(id)
        .with_context(|| format!("could not load observations for patient {id}"))?;

    let report = build_ward_report(&patient, &observations, config);
    print_report(&report, json)
}

fn print_report(report: &WardReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("could not serialize report")?
        );
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}

fn bp(args: BpArgs) -> anyhow::Result<()> {
    let sex = Sex::normalize(&args.sex);
    let limits = resolve_bp_limits(sex, args.age, args.height);
    let stage = classify_bp(args.reading.systolic, args.reading.diastolic, &limits);

    println!(
        "P90 {}/{} | P95 {}/{} | P95+12 {}/{}",
        limits.p90_systolic,
        limits.p90_diastolic,
        limits.p95_systolic,
        limits.p95_diastolic,
        limits.p99_systolic,
        limits.p99_diastolic
    );
    println!("{} -> {}", args.reading, stage.label());
    Ok(())
}

fn parse_regimen(value: &str) -> Result<DosingRegimen, String> {
    DosingRegimen::parse(value)
        .ok_or_else(|| format!("unknown regimen {value:?} (body_surface_area | weight_based)"))
}

fn parse_slot(value: &str) -> Result<TimeSlot, String> {
    TimeSlot::parse(value)
        .ok_or_else(|| format!("unknown slot {value:?} (08:00 | 14:00 | 20:00 | Extra)"))
}
