//! Serviços do motor de Ordens de Serviço
//!
//! Cada serviço encapsula o estado de uma tela ou fluxo: listagem,
//! detalhe/edição, criação em lote, mutação em lote e o cache de dados de
//! referência compartilhado.

pub mod bulk;
pub mod create_wizard;
pub mod detail_session;
pub mod list_view;
pub mod reference_data;
