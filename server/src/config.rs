//! Command-line and environment configuration.

use crate::auth::SupabaseConfig;
use clap::Parser;
use std::path::PathBuf;
use ttobak_billing::PolarConfig;
use ttobak_entitlement::EntitlementPolicy;
use ttobak_transform::GeneratorConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "ttobak-server")]
#[command(about = "Ttobak Korean text simplification API")]
pub struct Args {
    /// HTTP port to listen on
    #[arg(short, long, env = "TTOBAK_PORT", default_value = "3000")]
    pub port: u16,

    /// Path to the SQLite database
    #[arg(short, long, env = "TTOBAK_DATABASE", default_value = "ttobak.db")]
    pub database: PathBuf,

    /// Public base URL, used for checkout redirects
    #[arg(long, env = "TTOBAK_BASE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// API key for the text-generation provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Model identifier
    #[arg(long, env = "TTOBAK_MODEL", default_value = ttobak_transform::DEFAULT_MODEL)]
    pub model: String,

    /// Polar organization access token
    #[arg(long, env = "POLAR_ACCESS_TOKEN", hide_env_values = true)]
    pub polar_access_token: Option<String>,

    /// Polar product sold by the checkout
    #[arg(long, env = "POLAR_PRODUCT_ID")]
    pub polar_product_id: Option<String>,

    /// Discount code applied to every checkout
    #[arg(long, env = "POLAR_DISCOUNT_CODE")]
    pub polar_discount_code: Option<String>,

    /// Base URL of the Polar API
    #[arg(long, env = "POLAR_BASE_URL", default_value = "https://api.polar.sh")]
    pub polar_base_url: String,

    /// Supabase project URL, enables bearer-token sign-in
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase anon key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_anon_key: Option<String>,

    /// Free transforms per period
    #[arg(long, env = "TTOBAK_FREE_LIMIT", default_value_t = ttobak_entitlement::FREE_LIMIT)]
    pub free_limit: u32,

    /// Length of the email trial in days (1 to 3650)
    #[arg(
        long,
        env = "TTOBAK_TRIAL_DAYS",
        default_value_t = ttobak_entitlement::TRIAL_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=3650)
    )]
    pub trial_days: i64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn policy(&self) -> EntitlementPolicy {
        EntitlementPolicy {
            free_limit: self.free_limit,
            trial_days: self.trial_days,
        }
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            base_url: self.openai_base_url.clone(),
            api_key: self.openai_api_key.clone(),
            model: self.model.clone(),
            ..Default::default()
        }
    }

    pub fn polar_config(&self) -> PolarConfig {
        PolarConfig {
            api_base_url: self.polar_base_url.clone(),
            access_token: self.polar_access_token.clone(),
            product_id: self.polar_product_id.clone(),
            discount_code: self.polar_discount_code.clone(),
            app_base_url: self.base_url.clone(),
        }
    }

    pub fn supabase_config(&self) -> SupabaseConfig {
        SupabaseConfig {
            url: self.supabase_url.clone(),
            anon_key: self.supabase_anon_key.clone(),
        }
    }
}
