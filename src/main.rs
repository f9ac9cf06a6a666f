use clap::Parser;
use pdf_master::{cli, client, collector, config, edit, error, pipeline};
use cli::{Cli, Commands};
use client::BackendClient;
use config::Config;
use error::{PdfMasterError, Result};
use pdf_master_common::tool::{InputKind, ToolDefinition};
use pdf_master_common::{format_file_size, OptionValues, ToolKind};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Tools { tool } => match tool {
            Some(key) => match ToolKind::from_key(&key) {
                Some(kind) => print_tool_detail(kind.definition()),
                None => println!("未登録のツールです: {}", key),
            },
            None => {
                println!("📚 pdf-master - ツール一覧\n");
                for kind in ToolKind::ALL {
                    let def = kind.definition();
                    println!("  {} {:<18} {}", def.icon, def.key, def.title);
                }
                println!("\n詳細: pdf-master tools <ツール名>");
            }
        },

        Commands::Run { tool, files, options, out, no_progress } => {
            let server = config.server_url(cli.server.as_deref());
            let client = BackendClient::new(&server)?;
            let title = ToolKind::from_key(&tool)
                .map(|k| k.definition().title)
                .unwrap_or(tool.as_str());
            println!("📄 pdf-master - {}\n", title);

            let mut values = OptionValues::new();
            for assignment in &options {
                values
                    .set_assignment(assignment)
                    .map_err(PdfMasterError::InvalidOption)?;
            }

            if tool == ToolKind::EditPdf.key() {
                println!("💡 テキスト置換は `pdf-master edit <file>` で行います");
            }

            let output_dir = config.output_dir(out);
            let outcome = pipeline::run_tool(
                &client,
                &tool,
                &files,
                &values,
                &output_dir,
                !no_progress,
            )
            .await?;

            if outcome.duplicates_skipped > 0 {
                println!("- 重複ファイルを{}件スキップ", outcome.duplicates_skipped);
            }
            println!("✔ {}件のファイルを送信", outcome.files_sent);
            println!("✔ 保存: {}", outcome.output.display());
            println!("\n✅ Processing Complete! File downloaded.");
        }

        Commands::ExtractText { file, json } => {
            let server = config.server_url(cli.server.as_deref());
            let client = BackendClient::new(&server)?;
            let local = collector::local_file(&file)?;
            let text = client.extract_text(&local).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&text)?);
            } else {
                for (page, span) in text.spans() {
                    println!(
                        "[p{}] ({:.1}, {:.1}) {:.1}pt {}",
                        page + 1,
                        span.x,
                        span.y,
                        span.size,
                        span.text
                    );
                }
            }
        }

        Commands::Edit { file, out } => {
            println!("✏️ pdf-master - PDF編集\n");
            let server = config.server_url(cli.server.as_deref());
            let client = BackendClient::new(&server)?;
            let local = collector::local_file(&file)?;
            println!("{} ({})", local.name, format_file_size(local.size));

            let output_dir = config.output_dir(out);
            match edit::run_interactive_edit(&client, &local, &output_dir).await? {
                Some(path) => println!("\n✅ 保存: {}", path.display()),
                None => println!("\n編集を終了しました"),
            }
        }

        Commands::Config { set_server, set_output, show } => {
            let mut config = config;

            if let Some(url) = set_server {
                config.set_server_url(url)?;
                println!("✔ サーバーURLを設定しました");
            }

            if let Some(dir) = set_output {
                config.set_output_dir(dir)?;
                println!("✔ 出力ディレクトリを設定しました");
            }

            if show {
                println!("設定:");
                println!("  サーバー: {}", config.server_url(cli.server.as_deref()));
                println!(
                    "  出力先: {}",
                    config
                        .output_dir
                        .as_ref()
                        .map(|d| d.display().to_string())
                        .unwrap_or_else(|| "（カレントディレクトリ）".into())
                );
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_tool_detail(def: &ToolDefinition) {
    println!("{} {}", def.icon, def.title);
    println!("  {}", def.description);
    println!("  受付: {}", def.accept.html_accept());
    if let Some(endpoint) = def.endpoint {
        println!("  エンドポイント: {}", endpoint);
    }
    if def.options.is_empty() {
        return;
    }
    println!("\nオプション（-o KEY=VALUE）:");
    for field in def.options {
        let kind = match field.kind {
            InputKind::Text { .. } => "文字列".to_string(),
            InputKind::Password { .. } => "パスワード".to_string(),
            InputKind::Number { min: Some(min) } => format!("数値（{}以上）", min),
            InputKind::Number { min: None } => "数値".to_string(),
            InputKind::Select(choices) => choices
                .iter()
                .map(|c| c.value)
                .collect::<Vec<_>>()
                .join("|"),
            InputKind::Percent { min, max } => format!("{}-{}%", min, max),
        };
        let default = if field.default.is_empty() {
            String::new()
        } else {
            format!(" 既定: {}", field.default)
        };
        println!("  {:<16} {} [{}]{}", field.key, field.label, kind, default);
    }
}
