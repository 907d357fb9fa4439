// src/config.rs

use std::{env, path::PathBuf, str::FromStr, sync::Arc};

use anyhow::{bail, Context};

use crate::{
    db::{ClientRepository, CollectionBackend, InMemoryBackend, InvoiceRepository, JsonFileBackend},
    services::{
        client_service::{ClientSaveMode, ClientService},
        dashboard_service::DashboardService,
        invoice_service::InvoiceService,
        ledger::{NumberSource, NumberingPolicy},
    },
};

// Onde as coleções ficam guardadas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Json,
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StorageKind::Json),
            "memory" => Ok(StorageKind::Memory),
            other => Err(format!(
                "unknown storage backend `{other}` (expected `json` or `memory`)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub storage: StorageKind,
    pub data_dir: PathBuf,
    pub clients_file: String,
    pub invoices_file: String,
    pub client_save_mode: ClientSaveMode,
    pub numbering: NumberingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            storage: StorageKind::Json,
            data_dir: PathBuf::from("."),
            clients_file: "clients.json".to_string(),
            invoices_file: "invoices.json".to_string(),
            client_save_mode: ClientSaveMode::Upsert,
            numbering: NumberingPolicy::default(),
        }
    }
}

impl Config {
    /// Lê a configuração do ambiente (e do `.env`, se existir).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado do `from_env` para os testes não mexerem no ambiente do processo
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let width = match lookup("INVOICE_NUMBER_WIDTH") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("INVOICE_NUMBER_WIDTH inválido: `{raw}`"))?,
            None => defaults.numbering.width,
        };
        if !(1..=12).contains(&width) {
            bail!("INVOICE_NUMBER_WIDTH deve estar entre 1 e 12 (recebido {width})");
        }

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            storage: parse_var(&lookup, "STORAGE_BACKEND", defaults.storage)?,
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            clients_file: lookup("CLIENTS_FILE").unwrap_or(defaults.clients_file),
            invoices_file: lookup("INVOICES_FILE").unwrap_or(defaults.invoices_file),
            client_save_mode: parse_var(&lookup, "CLIENT_SAVE_MODE", defaults.client_save_mode)?,
            numbering: NumberingPolicy {
                source: parse_var(&lookup, "INVOICE_NUMBER_SOURCE", NumberSource::default())?,
                width,
            },
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> anyhow::Result<T>
where
    T: FromStr<Err = String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("{key} inválido")),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub client_service: ClientService,
    pub invoice_service: InvoiceService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let backend: Arc<dyn CollectionBackend> = match config.storage {
            StorageKind::Json => {
                let backend = JsonFileBackend::new(
                    &config.data_dir,
                    &config.clients_file,
                    &config.invoices_file,
                );
                backend
                    .bootstrap()
                    .await
                    .context("Falha ao preparar os arquivos de dados")?;
                tracing::info!("✅ Armazenamento em JSON em {}", config.data_dir.display());
                Arc::new(backend)
            }
            StorageKind::Memory => {
                tracing::info!("✅ Armazenamento em memória (os dados somem ao reiniciar)");
                Arc::new(InMemoryBackend::new())
            }
        };

        Self::with_backend(backend, config).await
    }

    // --- Monta o gráfico de dependências ---
    pub async fn with_backend(
        backend: Arc<dyn CollectionBackend>,
        config: &Config,
    ) -> anyhow::Result<Self> {
        let client_repo = ClientRepository::load(backend.clone())
            .await
            .context("Falha ao carregar os clientes")?;
        let invoice_repo = InvoiceRepository::load(backend)
            .await
            .context("Falha ao carregar as faturas")?;

        Ok(Self {
            client_service: ClientService::new(client_repo.clone(), config.client_save_mode),
            invoice_service: InvoiceService::new(invoice_repo.clone(), config.numbering),
            dashboard_service: DashboardService::new(client_repo, invoice_repo),
        })
    }
}
