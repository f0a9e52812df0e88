// Entry point and high-level CLI flow.
//
// - With `--region`, runs a single analysis for the given selection and
//   writes the xlsx report.
// - Otherwise shows a menu: option [1] loads both CSV files and prints load
//   diagnostics, option [2] asks for municipality/year/month and prints the
//   balance and rankings before writing the report.
use clap::Parser;
use comex_report::config::AppConfig;
use comex_report::types::{FilterSelection, MonthFilter, YearFilter};
use comex_report::util::{format_int, month_name};
use comex_report::{analyze, output, Analysis, DatasetService, ReportExporter, Result, TradeDataset};
use std::io::{self, Write};
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print `label` and read one trimmed line from stdin.
fn prompt(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    prompt("Enter choice: ")
}

/// Ask the user whether to go back to the menu after an analysis.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let resp = prompt("Back to Menu (Y/N): ").to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Pick an entry by 1-based number or by exact text; `None` on anything else.
fn pick<'a>(options: &'a [String], input: &str) -> Option<&'a String> {
    match input.parse::<usize>() {
        Ok(n) => n.checked_sub(1).and_then(|i| options.get(i)),
        Err(_) => options.iter().find(|o| o.eq_ignore_ascii_case(input)),
    }
}

fn ask_selection(dataset: &TradeDataset) -> Option<FilterSelection> {
    let regions = dataset.regions();
    println!("\nMunicipalities:");
    for (i, r) in regions.iter().enumerate() {
        println!("[{}] {}", i + 1, r);
    }
    let Some(region) = pick(&regions, &prompt("Municipality (number or name): ")) else {
        println!("Invalid municipality.\n");
        return None;
    };

    let mut years = vec!["All years".to_string()];
    years.extend(dataset.years().iter().map(|y| y.to_string()));
    println!("\nYears:");
    for (i, y) in years.iter().enumerate() {
        println!("[{}] {}", i + 1, y);
    }
    let year = match pick(&years, &prompt("Year: ")).map(String::as_str) {
        Some("All years") => YearFilter::All,
        Some(y) => YearFilter::Year(y.parse().ok()?),
        None => {
            println!("Invalid year.\n");
            return None;
        }
    };

    let month = if let YearFilter::Year(_) = year {
        let mut months = vec!["All months".to_string()];
        months.extend((1..=12).map(|m| month_name(m).to_string()));
        println!("\nMonths:");
        for (i, m) in months.iter().enumerate() {
            println!("[{}] {}", i + 1, m);
        }
        match pick(&months, &prompt("Month: ")).and_then(|m| months.iter().position(|x| x == m)) {
            Some(0) => MonthFilter::All,
            Some(i) => MonthFilter::Month(i as u32),
            None => {
                println!("Invalid month.\n");
                return None;
            }
        }
    } else {
        MonthFilter::All
    };

    Some(FilterSelection::new(region.clone(), year, month))
}

fn print_analysis(analysis: &Analysis) {
    println!("\nAnalysis for: {}", analysis.selection.region);
    println!("Period: {}\n", analysis.selection.period_description());
    output::print_balance(&analysis.balance);
    output::print_ranking("Top Exported Products", &analysis.exports);
    output::print_ranking("Top Imported Products", &analysis.imports);
}

/// Print the analysis and write its artifacts.
fn run_analysis(dataset: &TradeDataset, selection: FilterSelection, cfg: &AppConfig) -> Result<()> {
    let analysis = analyze(dataset, selection)?;
    print_analysis(&analysis);

    if let Some(path) = &cfg.json {
        output::write_json(path, &analysis.balance)?;
        println!("Balance summary saved to {}", path);
    }

    let input = analysis.report_input();
    if !input.has_data() {
        warn!(selection = %analysis.selection, "no data to export");
        println!("No data to generate the report for the current selection.\n");
        return Ok(());
    }
    let path = cfg.output_dir.join(input.file_name());
    ReportExporter::save(&input, &path)?;
    println!("(Report exported to {})\n", path.display());
    Ok(())
}

fn handle_load(service: &DatasetService) {
    match service.get_with_report() {
        Ok((dataset, report)) => {
            println!(
                "Processing dataset... ({} rows read, {} loaded, {} municipalities)",
                format_int(report.total_rows),
                format_int(report.loaded_rows),
                format_int(dataset.regions().len())
            );
            if report.skipped_rows > 0 {
                println!(
                    "Note: {} rows skipped (missing municipality, year or month).",
                    format_int(report.skipped_rows)
                );
            }
            if report.coerced_values > 0 {
                println!(
                    "Info: {} non-numeric FOB values counted as zero.",
                    format_int(report.coerced_values)
                );
            }
            println!();
        }
        Err(e) => {
            eprintln!("Failed to load files: {}\n", e);
        }
    }
}

fn handle_analyze(service: &DatasetService, cfg: &AppConfig) {
    if !service.is_loaded() {
        println!("Error: No data loaded. Please load the files first (option 1).\n");
        return;
    }
    let dataset = match service.get() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to load files: {}\n", e);
            return;
        }
    };
    let Some(selection) = ask_selection(dataset) else {
        return;
    };
    if let Err(e) = run_analysis(dataset, selection, cfg) {
        eprintln!("Error: {}\n", e);
    }
}

fn run_batch(service: &DatasetService, cfg: &AppConfig, region: &str) -> Result<()> {
    let dataset = service.get()?;
    let selection = FilterSelection::new(region, cfg.year, cfg.month);
    run_analysis(dataset, selection, cfg)
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::parse();
    let service = DatasetService::from_files(cfg.export_file.clone(), cfg.import_file.clone());

    if let Some(region) = cfg.region.as_deref() {
        if let Err(e) = run_batch(&service, &cfg, region) {
            error!(error = %e, "analysis failed");
            std::process::exit(1);
        }
        return;
    }

    loop {
        println!("Foreign Trade of Paraná Municipalities");
        println!("[1] Load the files");
        println!("[2] Analyze a municipality\n");
        match read_choice().as_str() {
            "1" => {
                handle_load(&service);
            }
            "2" => {
                handle_analyze(&service, &cfg);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
