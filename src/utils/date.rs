//! Utilidades de datas
//!
//! Este módulo normaliza os valores de data que chegam do servidor.
//! O API devolve tanto `YYYY-MM-DD` quanto `YYYY-MM-DDTHH:MM:SS`; toda a
//! lógica de comparação do motor trabalha sobre a chave `YYYY-MM-DD`.

use chrono::Local;

/// Extrai a chave de data (`YYYY-MM-DD`) de um valor vindo do servidor.
/// Valores vazios ou nulos viram `None`.
pub fn to_date_key(valor: Option<&str>) -> Option<String> {
    let bruto = valor?.trim();
    if bruto.is_empty() {
        return None;
    }
    let chave = bruto
        .split('T')
        .next()
        .and_then(|parte| parte.split(' ').next())
        .unwrap_or("");
    if chave.is_empty() {
        None
    } else {
        Some(chave.to_string())
    }
}

/// Chave de data de hoje no fuso local do operador.
pub fn hoje_key() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Deriva a data programada "efetiva": a maior chave não-nula entre os
/// cinco slots de programação, ou `None` se nenhum slot tem valor.
pub fn max_programado(slots: &[Option<String>]) -> Option<String> {
    let mut maior: Option<String> = None;
    for slot in slots {
        let Some(chave) = to_date_key(slot.as_deref()) else {
            continue;
        };
        match &maior {
            Some(atual) if *atual >= chave => {}
            _ => maior = Some(chave),
        }
    }
    maior
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_date_key() {
        assert_eq!(to_date_key(Some("2025-03-10")), Some("2025-03-10".into()));
        assert_eq!(
            to_date_key(Some("2025-03-10T14:22:00")),
            Some("2025-03-10".into())
        );
        assert_eq!(
            to_date_key(Some("2025-03-10 14:22:00")),
            Some("2025-03-10".into())
        );
        assert_eq!(to_date_key(Some("  2025-03-10  ")), Some("2025-03-10".into()));
        assert_eq!(to_date_key(Some("")), None);
        assert_eq!(to_date_key(Some("   ")), None);
        assert_eq!(to_date_key(None), None);
    }

    #[test]
    fn test_max_programado() {
        let slots = vec![
            Some("2025-01-10".to_string()),
            None,
            Some("2025-03-05T08:00:00".to_string()),
            Some("2025-02-20".to_string()),
            None,
        ];
        assert_eq!(max_programado(&slots), Some("2025-03-05".to_string()));
    }

    #[test]
    fn test_max_programado_todos_nulos() {
        let slots = vec![None, None, None, None, None];
        assert_eq!(max_programado(&slots), None);
    }

    #[test]
    fn test_max_programado_empata_na_chave() {
        // Dois slots no mesmo dia com horas diferentes viram a mesma chave
        let slots = vec![
            Some("2025-05-01T23:00:00".to_string()),
            Some("2025-05-01".to_string()),
        ];
        assert_eq!(max_programado(&slots), Some("2025-05-01".to_string()));
    }

    #[test]
    fn test_hoje_key_formato() {
        let hoje = hoje_key();
        assert_eq!(hoje.len(), 10);
        assert_eq!(&hoje[4..5], "-");
        assert_eq!(&hoje[7..8], "-");
    }
}
