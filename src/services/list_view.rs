//! Listagem de Ordens de Serviço
//!
//! Este módulo implementa o estado da tela de listagem: filtros, busca,
//! ordenação por coluna, paginação e seleção multi-registro. A lista local
//! é uma cópia somente-leitura do resultado do servidor; a única mutação
//! local permitida é o patch de status após um cancelamento confirmado.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::client::OsApi;
use crate::config::environment::PAGE_SIZES;
use crate::models::ordem_servico::{FiltrosOs, OrdemServicoResumo, OsStatus};
use crate::utils::errors::EngineError;

/// Coluna pela qual a listagem pode ser ordenada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColunaOrdenacao {
    AtivoCodpe,
    AtivoDescritivo,
    Pdm,
    Tipo,
    Checklist,
    RealizadoEm,
    ProgramadoMax,
    Status,
    ObsPcm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirecaoOrdenacao {
    Asc,
    Desc,
}

/// Estado da tela de listagem de OS
pub struct OsListView {
    api: Arc<dyn OsApi>,
    pub filtros: FiltrosOs,
    itens: Vec<OrdemServicoResumo>,
    erro: Option<String>,
    carregando: bool,
    coluna: ColunaOrdenacao,
    direcao: DirecaoOrdenacao,
    pagina: usize,
    page_size: usize,
    selecionados: HashSet<String>,
}

impl OsListView {
    pub fn new(api: Arc<dyn OsApi>, page_size: usize) -> Self {
        Self {
            api,
            filtros: FiltrosOs::default(),
            itens: Vec::new(),
            erro: None,
            carregando: false,
            coluna: ColunaOrdenacao::AtivoCodpe,
            direcao: DirecaoOrdenacao::Asc,
            pagina: 1,
            page_size: if PAGE_SIZES.contains(&page_size) {
                page_size
            } else {
                PAGE_SIZES[0]
            },
            selecionados: HashSet::new(),
        }
    }

    /// Recarrega a lista do servidor com os filtros correntes. Coordenação
    /// vazia é a pré-condição de não-busca: limpa a lista sem emitir
    /// request. Em erro a lista fica vazia (fail-closed) - nunca exibimos
    /// dados obsoletos junto com a mensagem de erro.
    pub async fn atualizar(&mut self) -> Result<(), EngineError> {
        if self.filtros.coordenacao.is_empty() {
            self.itens.clear();
            self.erro = None;
            return Ok(());
        }
        self.carregando = true;
        let resultado = self.api.listar_os(&self.filtros).await;
        self.carregando = false;
        match resultado {
            Ok(itens) => {
                self.itens = itens;
                self.erro = None;
                self.ajustar_pagina();
                Ok(())
            }
            Err(EngineError::SessaoExpirada) => Err(EngineError::SessaoExpirada),
            Err(erro) => {
                self.itens.clear();
                self.erro = Some(erro.to_string());
                Err(erro)
            }
        }
    }

    /// Substitui os filtros e volta para a primeira página.
    pub fn aplicar_filtros(&mut self, filtros: FiltrosOs) {
        self.filtros = filtros;
        self.pagina = 1;
    }

    /// Troca a coordenação. A equipe depende da coordenação, então é
    /// sempre limpa junto.
    pub fn definir_coordenacao(&mut self, coordenacao: impl Into<String>) {
        self.filtros.coordenacao = coordenacao.into();
        self.filtros.equipe = None;
        self.pagina = 1;
    }

    /// Clique no cabeçalho: mesma coluna inverte a direção, coluna nova
    /// começa ascendente.
    pub fn alternar_ordenacao(&mut self, coluna: ColunaOrdenacao) {
        if self.coluna == coluna {
            self.direcao = match self.direcao {
                DirecaoOrdenacao::Asc => DirecaoOrdenacao::Desc,
                DirecaoOrdenacao::Desc => DirecaoOrdenacao::Asc,
            };
        } else {
            self.coluna = coluna;
            self.direcao = DirecaoOrdenacao::Asc;
        }
    }

    pub fn ordenacao(&self) -> (ColunaOrdenacao, DirecaoOrdenacao) {
        (self.coluna, self.direcao)
    }

    /// Compara duas linhas na direção ascendente. Valores ausentes vão
    /// sempre para o fim da ordem ascendente; invertendo a ordenação
    /// inteira para a direção descendente eles terminam no topo.
    fn comparar(&self, a: &OrdemServicoResumo, b: &OrdemServicoResumo) -> Ordering {
        fn textos(a: &str, b: &str) -> Ordering {
            a.to_lowercase().cmp(&b.to_lowercase())
        }
        fn opcionais(a: Option<String>, b: Option<String>) -> Ordering {
            match (a, b) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => textos(&a, &b),
            }
        }
        match self.coluna {
            ColunaOrdenacao::AtivoCodpe => textos(&a.ativo_codpe, &b.ativo_codpe),
            ColunaOrdenacao::AtivoDescritivo => textos(&a.ativo_descritivo, &b.ativo_descritivo),
            ColunaOrdenacao::Pdm => a.os_pdm.cmp(&b.os_pdm),
            ColunaOrdenacao::Tipo => textos(&a.os_tipo.to_string(), &b.os_tipo.to_string()),
            ColunaOrdenacao::Checklist => a.os_checklist.cmp(&b.os_checklist),
            ColunaOrdenacao::RealizadoEm => {
                opcionais(a.os_realizado_em.clone(), b.os_realizado_em.clone())
            }
            ColunaOrdenacao::ProgramadoMax => {
                opcionais(a.data_programada_max(), b.data_programada_max())
            }
            ColunaOrdenacao::Status => textos(a.os_status.como_texto(), b.os_status.como_texto()),
            ColunaOrdenacao::ObsPcm => opcionais(a.os_obs_pcm.clone(), b.os_obs_pcm.clone()),
        }
    }

    /// Lista completa na ordem corrente.
    pub fn ordenados(&self) -> Vec<&OrdemServicoResumo> {
        let mut linhas: Vec<&OrdemServicoResumo> = self.itens.iter().collect();
        linhas.sort_by(|a, b| {
            let ordem = self.comparar(a, b);
            match self.direcao {
                DirecaoOrdenacao::Asc => ordem,
                DirecaoOrdenacao::Desc => ordem.reverse(),
            }
        });
        linhas
    }

    /// Linhas da página corrente, já ordenadas.
    pub fn pagina_atual(&self) -> Vec<&OrdemServicoResumo> {
        let inicio = (self.pagina - 1) * self.page_size;
        self.ordenados()
            .into_iter()
            .skip(inicio)
            .take(self.page_size)
            .collect()
    }

    /// Total de páginas; lista vazia ainda tem uma página.
    pub fn total_paginas(&self) -> usize {
        std::cmp::max(1, self.itens.len().div_ceil(self.page_size))
    }

    pub fn pagina(&self) -> usize {
        self.pagina
    }

    /// Navega para a página, saturando nos limites.
    pub fn definir_pagina(&mut self, pagina: usize) {
        self.pagina = pagina.clamp(1, self.total_paginas());
    }

    /// Troca o tamanho de página. Valor fora da lista aceita é ignorado;
    /// troca válida volta para a primeira página.
    pub fn definir_page_size(&mut self, page_size: usize) {
        if PAGE_SIZES.contains(&page_size) {
            self.page_size = page_size;
            self.pagina = 1;
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Mantém a página corrente válida quando o total de itens muda.
    fn ajustar_pagina(&mut self) {
        let total = self.total_paginas();
        if self.pagina > total {
            self.pagina = total;
        }
    }

    pub fn itens(&self) -> &[OrdemServicoResumo] {
        &self.itens
    }

    pub fn erro(&self) -> Option<&str> {
        self.erro.as_deref()
    }

    pub fn carregando(&self) -> bool {
        self.carregando
    }

    // Seleção multi-registro

    pub fn alternar_selecao(&mut self, id: &str) {
        if !self.selecionados.remove(id) {
            self.selecionados.insert(id.to_string());
        }
    }

    /// Checkbox do cabeçalho: se toda a página corrente está selecionada,
    /// remove exatamente esses ids; senão adiciona todos eles. Seleção de
    /// outras páginas não é tocada.
    pub fn alternar_selecao_pagina(&mut self) {
        let ids: Vec<String> = self
            .pagina_atual()
            .iter()
            .map(|linha| linha.id.clone())
            .collect();
        if ids.iter().all(|id| self.selecionados.contains(id)) {
            for id in &ids {
                self.selecionados.remove(id);
            }
        } else {
            for id in ids {
                self.selecionados.insert(id);
            }
        }
    }

    pub fn pagina_toda_selecionada(&self) -> bool {
        let pagina = self.pagina_atual();
        !pagina.is_empty()
            && pagina
                .iter()
                .all(|linha| self.selecionados.contains(&linha.id))
    }

    pub fn limpar_selecao(&mut self) {
        self.selecionados.clear();
    }

    pub fn selecionados(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selecionados.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn selecionado(&self, id: &str) -> bool {
        self.selecionados.contains(id)
    }

    /// Exceção única de mutação local: reflete o status devolvido pelo
    /// servidor após um cancelamento sem recarregar a lista inteira.
    pub fn patch_status(&mut self, id: &str, status: OsStatus) {
        if let Some(linha) = self.itens.iter_mut().find(|linha| linha.id == id) {
            linha.os_status = status;
        }
    }
}
