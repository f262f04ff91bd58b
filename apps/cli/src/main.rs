use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use vbaforge_core_sdk::{
    bundle, config::AppConfig, generator, provider, server, telemetry, FewShot,
    GenerateError, GenerationOptions, ProviderKind,
};

/**
 * \brief CLI 程序入口：生成调用 Chat Completion 的 Excel VBA 函数。
 */
#[derive(Parser, Debug)]
#[command(name = "vbaforge", version, about = "Generate Excel VBA functions that call OpenAI / Azure OpenAI")]
struct Cli {
    /** \brief 写入 logs/vbaforge.log（也可用 VBAFORGE_TELEMETRY=1） */
    #[arg(long, global = true, default_value_t = false)]
    enable_telemetry: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /**
     * \brief 生成 VBA 源码，输出到 stdout 或文件。
     */
    Generate {
        #[command(flatten)]
        options: OptionsArgs,
        /** \brief 输出文件，缺省打印到 stdout */
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /**
     * \brief 生成 VBA 源码并下载 JsonConverter.bas，一起写入目录。
     */
    Bundle {
        #[command(flatten)]
        options: OptionsArgs,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /** \brief 覆盖 JsonConverter.bas 下载地址 */
        #[arg(long)]
        json_converter_url: Option<String>,
    },

    /**
     * \brief 列出支持的 Provider 及其额外参数。
     */
    Providers,

    /**
     * \brief 启动本地 HTTP 服务并提供前端页面。
     */
    Serve {
        #[arg(long, default_value = "127.0.0.1:5173")]
        addr: String,
    },
}

#[derive(Args, Debug)]
struct OptionsArgs {
    #[arg(long, default_value = "openai")]
    provider: ProviderKind,
    #[arg(long, default_value = "")]
    api_key: String,
    #[arg(long)]
    function_name: String,
    #[arg(long, default_value = "", conflicts_with = "system_prompt_file")]
    system_prompt: String,
    /** \brief 从文件读取系统提示词 */
    #[arg(long)]
    system_prompt_file: Option<PathBuf>,
    /** \brief 少样本示例，可重复：--shot "问" "答" */
    #[arg(long = "shot", num_args = 2, value_names = ["HUMAN", "AI"], action = ArgAction::Append)]
    shots: Vec<String>,
    /** \brief 少样本 JSON 文件：[{"human": "...", "ai": "..."}] */
    #[arg(long)]
    few_shots: Option<PathBuf>,
    #[arg(long, default_value = "")]
    azure_endpoint: String,
    #[arg(long, default_value = "")]
    azure_deployment: String,
}

impl OptionsArgs {
    fn into_options(self) -> Result<GenerationOptions> {
        let system_prompt = match &self.system_prompt_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("read system prompt {} failed", path.display()))?,
            None => self.system_prompt,
        };

        let mut few_shots = match &self.few_shots {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("read few-shots {} failed", path.display()))?;
                serde_json::from_str::<Vec<FewShot>>(&text)
                    .with_context(|| format!("parse few-shots {} failed", path.display()))?
            }
            None => Vec::new(),
        };
        if self.shots.len() % 2 != 0 {
            bail!("--shot expects a HUMAN and an AI value");
        }
        few_shots.extend(
            self.shots
                .chunks(2)
                .map(|pair| FewShot::new(pair[0].as_str(), pair[1].as_str())),
        );

        Ok(GenerationOptions {
            provider: self.provider,
            api_key: self.api_key,
            function_name: self.function_name,
            system_prompt,
            few_shots,
            azure_endpoint: self.azure_endpoint,
            azure_deployment: self.azure_deployment,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::from_env();
    telemetry::set_log_dir(&config.log_dir);
    telemetry::set_enabled(cli.enable_telemetry || config.telemetry_enabled);

    match cli.command {
        Commands::Generate { options, output } => {
            let options = options.into_options()?;
            let module = generator::generate_logged(&options, "cli.generate")
                .map_err(explain)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &module.source)
                        .with_context(|| format!("write {} failed", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", module.source),
            }
        }
        Commands::Bundle {
            options,
            dir,
            json_converter_url,
        } => {
            let options = options.into_options()?;
            let url = json_converter_url.unwrap_or(config.json_converter_url);
            let bundle = bundle::build_bundle(&options, &url)
                .await
                .context("build bundle failed")?;
            let written = bundle::write_bundle(&dir, &bundle)
                .await
                .context("write bundle failed")?;
            for path in written {
                println!("Wrote {}", path.display());
            }
        }
        Commands::Providers => {
            for p in provider::descriptors() {
                println!("{} ({})", p.id, p.name);
                for input in p.inputs {
                    println!(
                        "  --{}  {} (e.g. {})",
                        input.id.replace('_', "-"),
                        input.label,
                        input.placeholder
                    );
                }
            }
        }
        Commands::Serve { addr } => {
            server::run(&addr, config).await?;
        }
    }

    Ok(())
}

fn explain(e: GenerateError) -> anyhow::Error {
    match e {
        GenerateError::InvalidFunctionName { message, .. } => anyhow::anyhow!(message),
        other => anyhow::Error::new(other).context("generate failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_with_shots() {
        let cli = Cli::try_parse_from([
            "vbaforge",
            "generate",
            "--provider",
            "azure",
            "--function-name",
            "Ask",
            "--shot",
            "hello",
            "hi",
            "--shot",
            "bye",
            "see you",
        ])
        .expect("parse cli");
        let Commands::Generate { options, output } = cli.command else {
            panic!("expected generate");
        };
        assert!(output.is_none());
        let opts = options.into_options().expect("options");
        assert_eq!(opts.provider, ProviderKind::AzureOpenAI);
        assert_eq!(
            opts.few_shots,
            vec![FewShot::new("hello", "hi"), FewShot::new("bye", "see you")]
        );
    }

    #[test]
    fn test_few_shots_file_precedes_inline_shots() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("shots.json");
        std::fs::write(&path, r#"[{"human":"q","ai":"a"}]"#).expect("write shots");

        let cli = Cli::try_parse_from([
            "vbaforge",
            "generate",
            "--function-name",
            "Ask",
            "--few-shots",
            path.to_str().expect("utf8 path"),
            "--shot",
            "q2",
            "a2",
        ])
        .expect("parse cli");
        let Commands::Generate { options, .. } = cli.command else {
            panic!("expected generate");
        };
        let opts = options.into_options().expect("options");
        assert_eq!(opts.few_shots, vec![FewShot::new("q", "a"), FewShot::new("q2", "a2")]);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let res = Cli::try_parse_from([
            "vbaforge",
            "generate",
            "--provider",
            "gemini",
            "--function-name",
            "Ask",
        ]);
        assert!(res.is_err());
    }
}
