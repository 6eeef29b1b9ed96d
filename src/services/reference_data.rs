//! Cache de dados de referência
//!
//! Este módulo mantém a estrutura organizacional e os ativos por equipe
//! carregados uma vez por sessão. Falha no carregamento degrada para lista
//! vazia com aviso, nunca derruba a tela.

use log::warn;
use std::collections::HashMap;
use std::sync::Arc;

use crate::client::OsApi;
use crate::models::estrutura::{Ativo, Estrutura};
use crate::utils::errors::EngineError;

/// Cache de sessão de estruturas e ativos
pub struct ReferenceDataCache {
    api: Arc<dyn OsApi>,
    estruturas: Vec<Estrutura>,
    ativos_por_equipe: HashMap<String, Vec<Ativo>>,
    /// Aviso de degradação visível ao operador quando um lookup falhou
    aviso: Option<String>,
}

impl ReferenceDataCache {
    pub fn new(api: Arc<dyn OsApi>) -> Self {
        Self {
            api,
            estruturas: Vec::new(),
            ativos_por_equipe: HashMap::new(),
            aviso: None,
        }
    }

    /// Carrega a estrutura organizacional, filtrando para as unidades
    /// elegíveis (ativas e executoras). Em caso de falha a lista fica vazia
    /// e o aviso é registrado; sessão expirada é repassada a quem chama.
    pub async fn carregar_estruturas(&mut self) -> Result<(), EngineError> {
        match self.api.listar_estruturas().await {
            Ok(estruturas) => {
                self.estruturas = estruturas
                    .into_iter()
                    .filter(Estrutura::elegivel)
                    .collect();
                self.aviso = None;
                Ok(())
            }
            Err(EngineError::SessaoExpirada) => Err(EngineError::SessaoExpirada),
            Err(erro) => {
                warn!("⚠️ Falha ao carregar estrutura organizacional: {}", erro);
                self.estruturas.clear();
                self.aviso = Some("Erro ao carregar estrutura.".to_string());
                Ok(())
            }
        }
    }

    /// Coordenações distintas na ordem em que o servidor as devolveu.
    pub fn coordenacoes(&self) -> Vec<String> {
        let mut vistas = Vec::new();
        for estrutura in &self.estruturas {
            if !vistas.contains(&estrutura.coordenacao) {
                vistas.push(estrutura.coordenacao.clone());
            }
        }
        vistas
    }

    /// Equipes da coordenação informada, dedupadas preservando a ordem.
    pub fn equipes(&self, coordenacao: &str) -> Vec<String> {
        let mut vistas = Vec::new();
        for estrutura in &self.estruturas {
            if estrutura.coordenacao == coordenacao && !vistas.contains(&estrutura.equipe) {
                vistas.push(estrutura.equipe.clone());
            }
        }
        vistas
    }

    /// Resolve o par coordenação/equipe para exatamente uma estrutura.
    /// Zero ou mais de uma correspondência devolve `None` - o chamador
    /// trata como estrutura inválida.
    pub fn resolver_estrutura(&self, coordenacao: &str, equipe: &str) -> Option<&Estrutura> {
        let mut encontrada = None;
        for estrutura in &self.estruturas {
            if estrutura.coordenacao == coordenacao && estrutura.equipe == equipe {
                if encontrada.is_some() {
                    return None;
                }
                encontrada = Some(estrutura);
            }
        }
        encontrada
    }

    /// Ativos da equipe, com leitura read-through: o primeiro acesso busca
    /// no servidor e os seguintes servem do cache. Falha degrada para lista
    /// vazia sem poluir o cache.
    pub async fn ativos_da_equipe(&mut self, equipe: &str) -> Result<Vec<Ativo>, EngineError> {
        if let Some(ativos) = self.ativos_por_equipe.get(equipe) {
            return Ok(ativos.clone());
        }
        match self.api.listar_ativos(Some(equipe)).await {
            Ok(ativos) => {
                self.ativos_por_equipe
                    .insert(equipe.to_string(), ativos.clone());
                Ok(ativos)
            }
            Err(EngineError::SessaoExpirada) => Err(EngineError::SessaoExpirada),
            Err(erro) => {
                warn!("⚠️ Falha ao carregar ativos da equipe {}: {}", equipe, erro);
                self.aviso = Some("Erro ao carregar ativos.".to_string());
                Ok(Vec::new())
            }
        }
    }

    /// Descarta tudo e recarrega a estrutura do servidor.
    pub async fn recarregar(&mut self) -> Result<(), EngineError> {
        self.estruturas.clear();
        self.ativos_por_equipe.clear();
        self.aviso = None;
        self.carregar_estruturas().await
    }

    pub fn aviso(&self) -> Option<&str> {
        self.aviso.as_deref()
    }

    pub fn estruturas(&self) -> &[Estrutura] {
        &self.estruturas
    }
}
