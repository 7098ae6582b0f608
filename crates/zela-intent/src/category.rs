// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed category keyword table.
//!
//! Labels produced here are free text; they are resolved to a household
//! category id only at commit time, and a miss there degrades to
//! uncategorized.

/// Category label -> trigger keywords, checked in order.
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "alimentação",
        &[
            "restaurante", "mercado", "supermercado", "padaria", "lanche", "pizza",
            "ifood", "comida", "almoço", "almoco", "jantar", "café", "cafe", "feira",
        ],
    ),
    (
        "transporte",
        &[
            "uber", "99", "taxi", "táxi", "gasolina", "combustível", "combustivel",
            "ônibus", "onibus", "metrô", "metro", "estacionamento", "pedágio", "pedagio",
        ],
    ),
    (
        "saúde",
        &[
            "farmácia", "farmacia", "remédio", "remedio", "médico", "medico",
            "dentista", "exame", "plano", "consulta",
        ],
    ),
    (
        "moradia",
        &[
            "aluguel", "condomínio", "condominio", "luz", "energia", "água", "agua",
            "gás", "gas", "internet", "iptu",
        ],
    ),
    (
        "educação",
        &["escola", "faculdade", "curso", "livro", "mensalidade", "material"],
    ),
    (
        "lazer",
        &[
            "cinema", "show", "viagem", "bar", "festa", "presente", "streaming",
            "netflix", "jogo",
        ],
    ),
    (
        "salário",
        &["salário", "salario", "pagamento", "freela", "freelance", "bônus", "bonus"],
    ),
];

/// Guess a category label by keyword membership over the message tokens.
pub fn guess(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| tokens.contains(k)) {
            return Some((*category).to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_keywords_map_to_alimentacao() {
        assert_eq!(guess("gastei 50 no restaurante").as_deref(), Some("alimentação"));
        assert_eq!(guess("compras do mercado").as_deref(), Some("alimentação"));
    }

    #[test]
    fn transport_and_housing_keywords() {
        assert_eq!(guess("uber para o centro").as_deref(), Some("transporte"));
        assert_eq!(guess("paguei o aluguel").as_deref(), Some("moradia"));
    }

    #[test]
    fn income_keywords_map_to_salario() {
        assert_eq!(guess("recebi meu salário hoje").as_deref(), Some("salário"));
    }

    #[test]
    fn matching_is_case_insensitive_and_token_based() {
        assert_eq!(guess("FARMÁCIA São João").as_deref(), Some("saúde"));
        // "mercadoria" must not match "mercado".
        assert_eq!(guess("mercadoria importada"), None);
    }

    #[test]
    fn unknown_text_has_no_category() {
        assert_eq!(guess("coisas diversas"), None);
    }
}
