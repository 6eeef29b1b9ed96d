//! Utilidades do sistema
//!
//! Este módulo contém utilidades para tratamento de erros e normalização
//! de datas usadas por todo o motor.

pub mod date;
pub mod errors;
