use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use disburse_cli::config::Config;
use disburse_cli::pipeline::{
    LoadedTemplate, deliver, load_csv, load_template, preview_row, read_mapping_file,
    resolve_mapping, resolve_target, suggest_mapping, transform_rows,
};
use disburse_map::{JsonFileStore, MapError, MappingStore, SavedMapping, validate};
use disburse_output::{DirectorySink, OutputLayout, plan_outputs};
use disburse_transform::{render_compact, render_pretty};

use crate::cli::{
    FieldsArgs, MappingsCommand, PreviewArgs, SuggestArgs, TransformArgs, ValidateArgs,
};
use crate::summary::{
    print_fields, print_mappings, print_outputs, print_suggestions, print_validation,
};

/// Settings shared by every command.
pub struct Settings {
    pub config: Config,
    pub mappings_dir: PathBuf,
}

impl Settings {
    fn store(&self) -> Result<JsonFileStore> {
        JsonFileStore::new(&self.mappings_dir)
            .with_context(|| format!("open mapping store {}", self.mappings_dir.display()))
    }
}

pub fn run_fields(args: &FieldsArgs) -> Result<i32> {
    let template = load_template(args.template.template.as_deref())?;
    let fields = if args.additional {
        template.additional_fields()
    } else {
        template.fields
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        print_fields(&fields);
    }
    Ok(0)
}

pub fn run_suggest(settings: &Settings, args: &SuggestArgs) -> Result<i32> {
    let template = load_template(args.template.template.as_deref())?;
    let report = load_csv(&args.csv)?;
    let outcome = suggest_mapping(&report.document, &template.fields, args.candidates);
    print_suggestions(&outcome);

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&outcome.table)?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        println!("Mapping written to {}", path.display());
    }
    if let Some(name) = &args.save {
        let mut saved = SavedMapping::new(name.clone(), outcome.table.clone());
        if template.source.is_some() {
            saved = saved.with_template(template.document.clone());
        }
        settings.store()?.save(&saved)?;
        println!("Saved mapping '{}' as {}", saved.name, saved.id);
    }
    Ok(0)
}

pub fn run_validate(settings: &Settings, args: &ValidateArgs) -> Result<i32> {
    let template = load_template(args.template.template.as_deref())?;
    let table = resolve_mapping(&settings.store()?, &args.mapping.mapping)?;
    let result = validate(&table, &template.fields);
    print_validation(&result, &table);
    Ok(if result.valid { 0 } else { 1 })
}

pub fn run_preview(settings: &Settings, args: &PreviewArgs) -> Result<i32> {
    let template = load_template(args.template.template.as_deref())?;
    let table = resolve_mapping(&settings.store()?, &args.mapping.mapping)?;
    let report = load_csv(&args.csv)?;
    let Some(document) = preview_row(&template, &table, &report.document) else {
        bail!("{} has no data rows", args.csv.display());
    };
    if args.compact {
        println!("{}", render_compact(&document));
    } else {
        println!("{}", render_pretty(&document));
    }
    Ok(0)
}

pub fn run_transform(settings: &Settings, args: &TransformArgs) -> Result<i32> {
    let span = info_span!("transform", csv = %args.csv.display());
    let _guard = span.enter();

    let template: LoadedTemplate = load_template(args.template.template.as_deref())?;
    let table = resolve_mapping(&settings.store()?, &args.mapping.mapping)?;
    let validation = validate(&table, &template.fields);
    if !validation.valid {
        print_validation(&validation, &table);
        if !args.allow_incomplete {
            bail!("mapping is incomplete; bind the fields above or pass --allow-incomplete");
        }
        warn!(
            missing = validation.missing_required_paths.len(),
            "continuing with unbound required fields"
        );
    }

    let report = load_csv(&args.csv)?;
    let documents = transform_rows(&template, &table, &report.document);
    let layout: OutputLayout = args.layout.map_or(settings.config.output.layout, Into::into);
    let source_name = args.csv.file_name().and_then(|name| name.to_str());
    let files = plan_outputs(&documents, layout, source_name);
    info!(documents = documents.len(), files = files.len(), layout = %layout, "planned outputs");

    if args.dry_run {
        for file in &files {
            println!("{} ({} bytes)", file.name, file.content.len());
        }
        println!("Dry run: {} documents, nothing written", documents.len());
        return Ok(0);
    }

    let root = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.config.output.directory.clone());
    let target = resolve_target(settings.config.upload.as_ref(), args.remote_path.as_deref());
    let sink = DirectorySink::new(&root);

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let remote_paths = deliver(&sink, &target, &files, |file| {
        progress.set_message(file.name.clone());
        progress.inc(1);
    })?;
    progress.finish_and_clear();

    print_outputs(&root, &remote_paths, documents.len(), &report.dropped_lines);
    Ok(0)
}

pub fn run_mappings(settings: &Settings, command: &MappingsCommand) -> Result<i32> {
    let store = settings.store()?;
    match command {
        MappingsCommand::List => {
            print_mappings(&store.list()?);
        }
        MappingsCommand::Show { mapping } => {
            let saved = match store.load(mapping) {
                Ok(saved) => saved,
                Err(MapError::NotFound { .. } | MapError::InvalidId { .. }) => store
                    .find_by_name(mapping)?
                    .with_context(|| format!("no saved mapping with id or name '{mapping}'"))?,
                Err(err) => return Err(err.into()),
            };
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
        MappingsCommand::Save {
            name,
            file,
            template,
        } => {
            let table = read_mapping_file(file)?;
            let mut saved = match store.find_by_name(name)? {
                Some(mut existing) => {
                    existing.update(table);
                    existing
                }
                None => SavedMapping::new(name.clone(), table),
            };
            if let Some(path) = template {
                saved = saved.with_template(load_template(Some(path.as_path()))?.document);
            }
            store.save(&saved)?;
            println!("Saved mapping '{}' as {}", saved.name, saved.id);
        }
        MappingsCommand::Delete { id } => {
            if store.delete(id)? {
                println!("Deleted mapping {id}");
            } else {
                println!("No saved mapping with id {id}");
                return Ok(1);
            }
        }
    }
    Ok(0)
}
