use anyhow::Context;
use clap::Parser;
use notecmd::cli::{
    run_delete, run_download, run_edit, run_export, run_import, run_list, run_menu, run_new, run_show,
    run_theme, Cli, Commands, ExternalEditor, NoteEditor,
};
use notecmd::cli::ui::set_dark_theme;
use notecmd::config::Config;
use notecmd::db::Database;
use notecmd::logging;
use notecmd::prefs::Preferences;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::from_env();
    let db = Database::open_at(config.db_path.clone())
        .with_context(|| format!("Could not open {}", config.db_path.display()))?;
    set_dark_theme(Preferences::new(&db, config.system_dark).dark_mode());
    let mut editor = ExternalEditor;

    match cli.command {
        None => {
            // No subcommand provided - show interactive menu
            run_menu(&db, &config, &mut editor)?;
        }
        Some(Commands::New(args)) => {
            let editor: Option<&mut dyn NoteEditor> = if args.edit { Some(&mut editor) } else { None };
            run_new(&db, args.title, args.text, args.html, editor)?;
        }
        Some(Commands::List(args)) => {
            run_list(&db, args.search.as_deref(), args.sort, args.limit)?;
        }
        Some(Commands::Show(args)) => {
            run_show(&db, &args.identifier, args.format)?;
        }
        Some(Commands::Edit(args)) => {
            run_edit(&db, &args.identifier, args.title, args.text, args.html, &mut editor)?;
        }
        Some(Commands::Delete(args)) => {
            run_delete(&db, &args.identifier, args.force)?;
        }
        Some(Commands::Export(args)) => {
            run_export(&db, &config.export_dir, args.output)?;
        }
        Some(Commands::Import(args)) => {
            run_import(&db, &args.path)?;
        }
        Some(Commands::Download(args)) => {
            run_download(&db, &args.identifier, args.format.into(), &config.export_dir, args.output)?;
        }
        Some(Commands::Theme(args)) => {
            run_theme(&db, config.system_dark, args.mode)?;
        }
    }

    Ok(())
}
