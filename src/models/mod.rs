//! Modelos do sistema
//!
//! Este módulo contém todos os modelos de dados que mapeiam exatamente
//! o contrato do API remoto de Ordens de Serviço.

pub mod auth;
pub mod estrutura;
pub mod ordem_servico;
