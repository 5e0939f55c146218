use anyhow::Context;
use clap::Parser;
use repair_pricer::{batch, cli, config, data, error, logging};
use cli::{Cli, Commands, PARTS_FLAG, PRICE_FORMULAS_FLAG, PRICE_PARTS_FLAG};
use config::Config;
use error::PricerError;
use repair_pricer_common::catalog::{self, CatalogIndex};
use repair_pricer_common::pricing::{PriceBook, PriceCalculator, PriceRequest, PriceSource};
use repair_pricer_common::{detect, filter_by_device, select_parts, PartFilter, PartRecord, SearchQuery};
use serde::Serialize;
use std::path::Path;

/// `--count` 指定時の出力
#[derive(Serialize)]
struct CountOutput {
    count: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // config コマンドは自前で読み込む（壊れた設定ファイルも --init で作り直せる）
    let config = match cli.command {
        Commands::Config { .. } => Config::default(),
        _ => Config::load()?,
    };
    let needs_parts = cli.command.needs_parts_file();

    let catalog_path = cli.catalog.clone().or_else(|| config.catalog.clone());

    match cli.command {
        Commands::Detect { text } => {
            let index = build_index(catalog_path.as_deref(), &config)?;
            let detections: Vec<_> = text.iter().map(|t| detect(t, &index)).collect();
            print_json(&detections)?;
        }

        Commands::Enrich { parts, device, search, filter, count, output } => {
            let parts_path = data::resolve_path(parts, config.parts.as_deref(), "部品マスタ", PARTS_FLAG)?;
            let index = build_index(catalog_path.as_deref(), &config)?;
            let records = data::load_parts(&parts_path)
                .with_context(|| format!("部品マスタの読み込みに失敗: {}", parts_path.display()))?;

            let query = search.as_deref().and_then(SearchQuery::parse);
            let filter = PartFilter::from(filter);
            let records: Vec<PartRecord> = select_parts(&records, query.as_ref(), &filter)
                .into_iter()
                .cloned()
                .collect();

            let to_file = output.is_some() && !count;
            if to_file {
                println!("🔍 repair-pricer - 機種判定\n");
                println!("[1/2] {}件の部品を判定中...", records.len());
            }
            let enriched = batch::enrich_all(&records, &index, to_file);

            let selected: Vec<_> = match device.as_deref() {
                Some(key) => filter_by_device(&enriched, key),
                None => enriched.iter().collect(),
            };

            match output {
                _ if count => print_json(&CountOutput { count: selected.len() })?,
                Some(path) => {
                    println!("✔ 判定完了（{}件）\n", selected.len());
                    println!("[2/2] 結果を保存中...");
                    std::fs::write(&path, serde_json::to_string_pretty(&selected)?)?;
                    println!("✔ 結果を保存: {}", path.display());
                }
                None => print_json(&selected)?,
            }
        }

        Commands::Search { term, parts, filter, count } => {
            let parts_path = data::resolve_path(parts, config.parts.as_deref(), "部品マスタ", PARTS_FLAG)?;
            let query = SearchQuery::parse(&term)
                .ok_or_else(|| PricerError::InvalidArgument("検索語が空です".into()))?;
            let records = data::load_parts(&parts_path)
                .with_context(|| format!("部品マスタの読み込みに失敗: {}", parts_path.display()))?;

            let found = select_parts(&records, Some(&query), &PartFilter::from(filter));
            if count {
                print_json(&CountOutput { count: found.len() })?;
            } else {
                print_json(&found)?;
            }
        }

        Commands::Price {
            formula,
            parts,
            manual_total,
            manual_label,
            labor,
            dealer,
            detect: with_detection,
            parts_file,
            formulas_file,
        } => {
            let formulas_path = data::resolve_path(
                formulas_file,
                config.formulas.as_deref(),
                "価格式",
                PRICE_FORMULAS_FLAG,
            )?;
            let formulas = data::load_formulas(&formulas_path)
                .with_context(|| format!("価格式の読み込みに失敗: {}", formulas_path.display()))?;

            let records = if needs_parts {
                let parts_path =
                    data::resolve_path(parts_file, config.parts.as_deref(), "部品マスタ", PRICE_PARTS_FLAG)?;
                data::load_parts(&parts_path)
                    .with_context(|| format!("部品マスタの読み込みに失敗: {}", parts_path.display()))?
            } else {
                Vec::new()
            };

            let request = PriceRequest {
                manual_total: manual_total.as_deref().map(Into::into),
                manual_label,
                parts: Some(parts.into_iter().map(|p| p.0).collect()),
                part_id: None,
                formula_id: formula,
                labor_level: labor.as_deref().map(Into::into),
                customer_type: dealer.then(|| "dealer".to_string()),
            };

            let book = PriceBook::new(records, formulas);
            let calculator = PriceCalculator::new(config.pricing.clone());
            let mut result = calculator.calculate(&request, &book).map_err(PricerError::from)?;

            if with_detection {
                let index = build_index(catalog_path.as_deref(), &config)?;
                let category = request
                    .selections()
                    .first()
                    .and_then(|sel| book.part(sel.part_id))
                    .and_then(|part| detect(&part.search_text(), &index).category);
                result = result.with_category(category);
            }

            print_json(&result)?;
        }

        Commands::Catalog { search, category } => {
            let entries = data::load_catalog(catalog_path.as_deref())?;
            let found = catalog::filter_entries(&entries, search.as_deref(), category);
            print_json(&found)?;
        }

        Commands::Config { show, init } => run_config(show, init)?,
    }

    Ok(())
}

fn build_index(path: Option<&Path>, config: &Config) -> error::Result<CatalogIndex> {
    let entries = data::load_catalog(path)?;
    Ok(CatalogIndex::build(entries, config.matching.clone()))
}

fn run_config(show: bool, init: bool) -> anyhow::Result<()> {
    let path = Config::config_path()?;

    if init {
        Config::init_at(&path)?;
        println!("✔ 設定ファイルを作成しました: {}", path.display());
    }

    if show || !init {
        let config = Config::load_from(&path)?;
        println!("設定: {}", path.display());
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> error::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
