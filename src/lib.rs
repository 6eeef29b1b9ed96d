//! # tecrail_os
//!
//! Motor de ciclo de vida e mutação em lote de Ordens de Serviço (OS) de
//! manutenção ferroviária. Encapsula o contrato do API remoto em tipos
//! fortes e implementa as regras das telas de planejamento: máquina de
//! estados do ciclo de vida, travas de edição, criação em lote por ativo,
//! mutação multi-registro com pré-checagem de transições, listagem com
//! filtro/ordenação/paginação e o cache de dados de referência.
//!
//! O servidor é o único dono do estado persistido; este crate mantém
//! apenas cópias de sessão e nunca inventa dados localmente.

pub mod client;
pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use client::{OsApi, OsHttpClient};
pub use models::auth::Permissions;
pub use models::ordem_servico::{
    FiltrosOs, OrdemServico, OrdemServicoResumo, OsStatus, OsTipo,
};
pub use state::EngineState;
pub use utils::errors::{EngineError, EngineResult};
