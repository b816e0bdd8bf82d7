//! Prompt templates for the financial-news summary

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Name of the placeholder receiving the formatted context
pub const CONTEXT_VAR: &str = "context";

const INTRO: &str = "Tu es un assistant d'analyse financière pour un trader expérimenté. \
Ta mission est de synthétiser les actualités financières fournies dans le CONTEXTE ci-dessous. \
Tu dois aller droit au but.";

const RULE_SOURCES: &str = "**Sources** : varie les sources autant que possible.";
const RULE_LINK: &str = "**Source cliquable** : Termine **chaque point** par le lien vers l'article original, \
formaté en Markdown comme ceci : `[nom de la source](lien url complet)`. Si le lien n'est pas disponible, \
essaie de l'extraire du message lui-même (qui se termine souvent par un lien URL)";
const RULE_LANGUAGE: &str = "**Langue** : La réponse doit être exclusivement en **Français**.";
const RULE_FACTS: &str = "**Factualité** : Base ta réponse **uniquement** sur les informations présentes \
dans le contexte. N'ajoute aucune information externe.";
const RULE_STYLE: &str = "**Style** : Utilise un style télégraphique, direct et factuel.";
const RULE_SENTIMENT: &str = "**Sentiment** : Pour chaque point, indique clairement le sentiment : \
[Positif], [Négatif] ou [Neutre].";
const RULE_PUBLICATION: &str = "**Publication** : Vérifie que la date de publication de chaque article \
source correspond à la demande. Si aucune date n'est mentionnée dans la requête, prends les articles \
les plus récents en priorité.";

const EXAMPLE: &str = "### EXEMPLE DE RÉPONSE ATTENDUE :
* [Positif] Apple Inc. surperforme le marché suite à l'annonce d'un rachat d'actions massif et d'un partenariat stratégique. [Bloomberg](https://www.bloomberg.com/news/apple-12345)
* [Négatif] Le CAC 40 est pénalisé par des craintes sur la chaîne d'approvisionnement et la hausse des coûts des matières premières. [Les Echos](https://www.lesechos.fr/news/cac40-54321)";

/// Versions of the instruction template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateVariant {
    /// Summary followed by the 5 most relevant articles
    #[default]
    TopFive,
    /// Summary followed by every relevant article
    AllRelevant,
    /// Top five, plus a rule on publication-date relevance
    TopFiveDated,
}

impl TemplateVariant {
    /// Build the instruction template for this variant
    #[must_use]
    pub fn template(self) -> PromptTemplate {
        let listing = match self {
            Self::TopFive | Self::TopFiveDated => "les 5 articles les plus pertinents",
            Self::AllRelevant => "tous les articles pertinents",
        };
        let summary_rule = format!(
            "**Synthèse concise** : dans ta réponse, commence par fournir un résumé des actualités \
les plus pertinentes en 100 mots. Puis, sous forme de liste à puces, liste {listing} qui détaillent l'actualité."
        );

        let mut rules = vec![
            summary_rule.as_str(),
            RULE_SOURCES,
            RULE_LINK,
            RULE_LANGUAGE,
            RULE_FACTS,
            RULE_STYLE,
            RULE_SENTIMENT,
        ];
        if self == Self::TopFiveDated {
            rules.push(RULE_PUBLICATION);
        }

        let mut text = format!("{INTRO}\n\n### CONSIGNES :\n");
        for (idx, rule) in rules.iter().enumerate() {
            text.push_str(&format!("{}.  {rule}\n", idx + 1));
        }
        text.push('\n');
        text.push_str(EXAMPLE);
        text.push_str("\n\n### CONTEXTE :\n{{context}}\n");

        PromptTemplate::new(text)
    }
}

/// Template with `{{name}}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template in a single pass.
    ///
    /// Substituted values are never rescanned, so a value that itself contains
    /// `{{...}}` is inserted verbatim. Placeholders without a value are kept.
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut result = String::with_capacity(
            self.template.len() + values.values().map(|v| v.len()).sum::<usize>(),
        );
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            let Some(len) = rest[start + 2..].find("}}") else {
                break;
            };
            let name = &rest[start + 2..start + 2 + len];
            result.push_str(&rest[..start]);
            match values.get(name) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[start..start + len + 4]),
            }
            rest = &rest[start + len + 4..];
        }
        result.push_str(rest);
        result
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Raw template text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        let name = &rest[start + 2..start + 2 + len];
        if !name.is_empty() && !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
        rest = &rest[start + len + 4..];
    }

    variables
}

/// System instructions plus the user's question, built once per submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    system_instructions: String,
    user_query: String,
}

impl Prompt {
    pub fn system_instructions(&self) -> &str {
        &self.system_instructions
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }
}

/// Embeds a formatted context into an instruction template
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    template: PromptTemplate,
}

impl PromptAssembler {
    #[must_use]
    pub fn new(variant: TemplateVariant) -> Self {
        Self {
            template: variant.template(),
        }
    }

    /// The output rules in the template are advisory; nothing checks the
    /// model's answer against them.
    #[must_use]
    pub fn assemble(&self, context: &str, user_query: &str) -> Prompt {
        let values = HashMap::from([(CONTEXT_VAR, context)]);
        Prompt {
            system_instructions: self.template.render(&values),
            user_query: user_query.to_string(),
        }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(TemplateVariant::default())
    }
}
