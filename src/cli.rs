use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-master")]
#[command(about = "PDFツール群（結合・変換・透かし・署名・編集）のクライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 接続先サーバー（環境変数・設定ファイルより優先）
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 利用できるツールの一覧
    Tools {
        /// ツールを指定するとオプションの詳細を表示
        tool: Option<String>,
    },

    /// ツールを実行して結果をダウンロード
    Run {
        /// ツール名（例: merge, add-watermark）
        #[arg(required = true)]
        tool: String,

        /// 入力ファイルまたはフォルダ
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// ツールのオプション（KEY=VALUE、複数指定可）
        #[arg(short, long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,

        /// 出力ディレクトリ
        #[arg(long)]
        out: Option<PathBuf>,

        /// 進捗バーを表示しない
        #[arg(long)]
        no_progress: bool,
    },

    /// PDFのテキストと位置を抽出
    ExtractText {
        /// 入力PDF
        #[arg(required = true)]
        file: PathBuf,

        /// JSONのまま出力
        #[arg(long)]
        json: bool,
    },

    /// PDFのテキストを対話式で置換
    Edit {
        /// 入力PDF
        #[arg(required = true)]
        file: PathBuf,

        /// 出力ディレクトリ
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// 設定
    Config {
        /// サーバーURLを設定
        #[arg(long)]
        set_server: Option<String>,

        /// 既定の出力ディレクトリを設定
        #[arg(long)]
        set_output: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_options() {
        let cli = Cli::try_parse_from([
            "pdf-master",
            "run",
            "add-watermark",
            "a.pdf",
            "b.pdf",
            "-o",
            "watermarkText=DRAFT",
            "--option",
            "opacity=30",
            "--no-progress",
        ])
        .unwrap();

        match cli.command {
            Commands::Run { tool, files, options, out, no_progress } => {
                assert_eq!(tool, "add-watermark");
                assert_eq!(files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
                assert_eq!(options, vec!["watermarkText=DRAFT", "opacity=30"]);
                assert!(out.is_none());
                assert!(no_progress);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pdf-master",
            "extract-text",
            "doc.pdf",
            "--server",
            "http://10.0.0.2:5000",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.server.as_deref(), Some("http://10.0.0.2:5000"));
        assert!(matches!(cli.command, Commands::ExtractText { json: false, .. }));
    }

    #[test]
    fn test_run_requires_files() {
        assert!(Cli::try_parse_from(["pdf-master", "run", "merge"]).is_err());
    }
}
