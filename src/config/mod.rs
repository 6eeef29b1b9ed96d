//! Configuração do motor

pub mod environment;
