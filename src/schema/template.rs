//! Template generation for new entities

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::core::identity::EntityId;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Context for template generation
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub id: EntityId,
    pub author: String,
    pub created: DateTime<Utc>,
    pub title: Option<String>,
    pub tags: Vec<String>,
    // DEAL fields
    pub deal_type: Option<String>,
    pub stage: Option<String>,
    pub market: Option<String>,
    pub estimated_value: Option<f64>,
    pub purchase_price: Option<f64>,
    // PRO fields
    pub deal_ref: Option<EntityId>,
    pub number_of_units: Option<u32>,
    pub sales_price_per_unit: Option<f64>,
    pub direct_cost_per_unit: Option<f64>,
    // TASK fields
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    // CON fields
    pub role: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl TemplateContext {
    pub fn new(id: EntityId, author: String) -> Self {
        Self {
            id,
            author,
            created: Utc::now(),
            title: None,
            tags: Vec::new(),
            deal_type: None,
            stage: None,
            market: None,
            estimated_value: None,
            purchase_price: None,
            deal_ref: None,
            number_of_units: None,
            sales_price_per_unit: None,
            direct_cost_per_unit: None,
            status: None,
            priority: None,
            due_date: None,
            role: None,
            company: None,
            email: None,
            phone: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_deal_type(mut self, deal_type: impl Into<String>) -> Self {
        self.deal_type = Some(deal_type.into());
        self
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    pub fn with_estimated_value(mut self, value: f64) -> Self {
        self.estimated_value = Some(value);
        self
    }

    pub fn with_purchase_price(mut self, price: f64) -> Self {
        self.purchase_price = Some(price);
        self
    }

    pub fn with_deal_ref(mut self, deal: EntityId) -> Self {
        self.deal_ref = Some(deal);
        self
    }

    pub fn with_number_of_units(mut self, units: u32) -> Self {
        self.number_of_units = Some(units);
        self
    }

    pub fn with_sales_price_per_unit(mut self, price: f64) -> Self {
        self.sales_price_per_unit = Some(price);
        self
    }

    pub fn with_direct_cost_per_unit(mut self, cost: f64) -> Self {
        self.direct_cost_per_unit = Some(cost);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Template generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Render `Some(value)` as a quoted YAML scalar, `None`/empty as YAML null
fn opt_text(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.is_empty() => format!("\"{}\"", v),
        _ => String::new(),
    }
}

/// Render a tag list as a YAML flow sequence
fn tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        "[]".to_string()
    } else {
        format!("[{}]", tags.join(", "))
    }
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    fn base_context(&self, ctx: &TemplateContext) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("id", &ctx.id.to_string());
        context.insert("author", &ctx.author);
        context.insert("created", &ctx.created.to_rfc3339());
        context.insert("title", &ctx.title.clone().unwrap_or_default());
        context.insert("tags", &tag_list(&ctx.tags));
        context
    }

    fn render(&self, name: &str, context: &tera::Context) -> Option<Result<String, TemplateError>> {
        if self.tera.get_template_names().any(|n| n == name) {
            Some(
                self.tera
                    .render(name, context)
                    .map_err(|e| TemplateError::RenderError(e.to_string())),
            )
        } else {
            None
        }
    }

    /// Generate a deal file
    pub fn generate_deal(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let mut context = self.base_context(ctx);
        context.insert("deal_type", &opt_text(&ctx.deal_type));
        context.insert(
            "stage",
            &ctx.stage.clone().unwrap_or_else(|| "prospecting".to_string()),
        );
        context.insert("market", &opt_text(&ctx.market));
        context.insert("estimated_value", &ctx.estimated_value.unwrap_or(0.0));
        context.insert("purchase_price", &ctx.purchase_price.unwrap_or(0.0));

        match self.render("deal.yaml.tera", &context) {
            Some(result) => result,
            None => Ok(self.hardcoded_deal_template(ctx)),
        }
    }

    /// Generate a proforma file
    pub fn generate_proforma(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let mut context = self.base_context(ctx);
        context.insert(
            "deal",
            &ctx.deal_ref.as_ref().map(|d| d.to_string()).unwrap_or_default(),
        );
        context.insert("number_of_units", &ctx.number_of_units.unwrap_or(0));
        context.insert(
            "sales_price_per_unit",
            &ctx.sales_price_per_unit.unwrap_or(0.0),
        );
        context.insert(
            "direct_cost_per_unit",
            &ctx.direct_cost_per_unit.unwrap_or(0.0),
        );
        context.insert("purchase_price", &ctx.purchase_price.unwrap_or(0.0));

        match self.render("pro.yaml.tera", &context) {
            Some(result) => result,
            None => Ok(self.hardcoded_proforma_template(ctx)),
        }
    }

    /// Generate a task file
    pub fn generate_task(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let mut context = self.base_context(ctx);
        context.insert(
            "deal",
            &ctx.deal_ref.as_ref().map(|d| d.to_string()).unwrap_or_default(),
        );
        context.insert(
            "status",
            &ctx.status.clone().unwrap_or_else(|| "todo".to_string()),
        );
        context.insert(
            "priority",
            &ctx.priority.clone().unwrap_or_else(|| "medium".to_string()),
        );
        context.insert("due_date", &ctx.due_date.clone().unwrap_or_default());

        match self.render("task.yaml.tera", &context) {
            Some(result) => result,
            None => Ok(self.hardcoded_task_template(ctx)),
        }
    }

    /// Generate a contact file
    pub fn generate_contact(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let mut context = self.base_context(ctx);
        context.insert(
            "role",
            &ctx.role.clone().unwrap_or_else(|| "other".to_string()),
        );
        context.insert("company", &opt_text(&ctx.company));
        context.insert("email", &opt_text(&ctx.email));
        context.insert("phone", &opt_text(&ctx.phone));

        match self.render("con.yaml.tera", &context) {
            Some(result) => result,
            None => Ok(self.hardcoded_contact_template(ctx)),
        }
    }

    /// Generate a timeline file
    pub fn generate_timeline(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let mut context = self.base_context(ctx);
        context.insert(
            "deal",
            &ctx.deal_ref.as_ref().map(|d| d.to_string()).unwrap_or_default(),
        );

        match self.render("tml.yaml.tera", &context) {
            Some(result) => result,
            None => Ok(self.hardcoded_timeline_template(ctx)),
        }
    }

    fn hardcoded_deal_template(&self, ctx: &TemplateContext) -> String {
        let title = ctx.title.clone().unwrap_or_default();
        let deal_type = opt_text(&ctx.deal_type);
        let stage = ctx.stage.clone().unwrap_or_else(|| "prospecting".to_string());
        let market = opt_text(&ctx.market);
        let estimated_value = ctx.estimated_value.unwrap_or(0.0);
        let purchase_price = ctx.purchase_price.unwrap_or(0.0);
        let tags = tag_list(&ctx.tags);
        let created = ctx.created.to_rfc3339();

        format!(
            r#"# Deal: {title}
# Created by Plat - plain-text deal tracking

id: {id}
title: "{title}"
deal_type: {deal_type}
stage: {stage}

market: {market}
estimated_value: {estimated_value}
purchase_price: {purchase_price}

# Stamped by `plat deal stage`, or set by hand
# contract_date: 2026-01-15
# close_date: 2026-06-30

description: |
  # Site, seller, angle. What makes this deal worth chasing?

tags: {tags}

links:
  contacts: []

# Auto-managed metadata
created: {created}
author: {author}
revision: 1
"#,
            id = ctx.id,
            title = title,
            deal_type = deal_type,
            stage = stage,
            market = market,
            estimated_value = estimated_value,
            purchase_price = purchase_price,
            tags = tags,
            created = created,
            author = ctx.author,
        )
    }

    fn hardcoded_proforma_template(&self, ctx: &TemplateContext) -> String {
        let title = ctx.title.clone().unwrap_or_default();
        let deal = ctx.deal_ref.as_ref().map(|d| d.to_string()).unwrap_or_default();
        let number_of_units = ctx.number_of_units.unwrap_or(0);
        let sales_price_per_unit = ctx.sales_price_per_unit.unwrap_or(0.0);
        let direct_cost_per_unit = ctx.direct_cost_per_unit.unwrap_or(0.0);
        let purchase_price = ctx.purchase_price.unwrap_or(0.0);
        let created = ctx.created.to_rfc3339();

        format!(
            r#"# Proforma: {title}
# Created by Plat - plain-text deal tracking

id: {id}
title: "{title}"
deal: {deal}

# Unit economics
number_of_units: {number_of_units}
sales_price_per_unit: {sales_price_per_unit}
direct_cost_per_unit: {direct_cost_per_unit}

# Project costs
purchase_price: {purchase_price}
development_costs: 0
soft_costs: 0
financing_costs: 0

# Unset percentages fall back to configured assumptions
# contingency_percentage: 5.0
# sales_commission_percentage: 3.0

notes: |
  # Basis of estimate, comps, caveats

# Auto-managed metadata
created: {created}
author: {author}
revision: 1
"#,
            id = ctx.id,
            title = title,
            deal = deal,
            number_of_units = number_of_units,
            sales_price_per_unit = sales_price_per_unit,
            direct_cost_per_unit = direct_cost_per_unit,
            purchase_price = purchase_price,
            created = created,
            author = ctx.author,
        )
    }

    fn hardcoded_task_template(&self, ctx: &TemplateContext) -> String {
        let title = ctx.title.clone().unwrap_or_default();
        let deal = ctx.deal_ref.as_ref().map(|d| d.to_string()).unwrap_or_default();
        let status = ctx.status.clone().unwrap_or_else(|| "todo".to_string());
        let priority = ctx.priority.clone().unwrap_or_else(|| "medium".to_string());
        let due_date = ctx.due_date.clone().unwrap_or_default();
        let tags = tag_list(&ctx.tags);
        let created = ctx.created.to_rfc3339();

        format!(
            r#"# Task: {title}
# Created by Plat - plain-text deal tracking

id: {id}
title: "{title}"
deal: {deal}
status: {status}
priority: {priority}
due_date: {due_date}

description: |
  # What needs to happen, and what does done look like?

tags: {tags}

# Auto-managed metadata
created: {created}
author: {author}
revision: 1
"#,
            id = ctx.id,
            title = title,
            deal = deal,
            status = status,
            priority = priority,
            due_date = due_date,
            tags = tags,
            created = created,
            author = ctx.author,
        )
    }

    fn hardcoded_contact_template(&self, ctx: &TemplateContext) -> String {
        let title = ctx.title.clone().unwrap_or_default();
        let role = ctx.role.clone().unwrap_or_else(|| "other".to_string());
        let company = opt_text(&ctx.company);
        let email = opt_text(&ctx.email);
        let phone = opt_text(&ctx.phone);
        let tags = tag_list(&ctx.tags);
        let created = ctx.created.to_rfc3339();

        format!(
            r#"# Contact: {title}
# Created by Plat - plain-text deal tracking

id: {id}
title: "{title}"
company: {company}
role: {role}

email: {email}
phone: {phone}

notes: |
  # How we met, context, preferences

tags: {tags}

links:
  deals: []

# Auto-managed metadata
created: {created}
author: {author}
revision: 1
"#,
            id = ctx.id,
            title = title,
            company = company,
            role = role,
            email = email,
            phone = phone,
            tags = tags,
            created = created,
            author = ctx.author,
        )
    }

    fn hardcoded_timeline_template(&self, ctx: &TemplateContext) -> String {
        let title = ctx.title.clone().unwrap_or_default();
        let deal = ctx.deal_ref.as_ref().map(|d| d.to_string()).unwrap_or_default();
        let created = ctx.created.to_rfc3339();

        format!(
            r#"# Timeline: {title}
# Created by Plat - plain-text deal tracking

id: {id}
title: "{title}"
deal: {deal}

# Phases render as bars in `plat timeline gantt`, ordered by `order`
phases: []
# phases:
#   - name: "Due diligence"
#     start_date: 2026-01-15
#     end_date: 2026-03-15
#     order: 1
#     status: planned

# Milestones render as markers under the chart
milestones: []
# milestones:
#   - name: "Close on land"
#     due_date: 2026-04-01
#     status: pending

# Auto-managed metadata
created: {created}
author: {author}
revision: 1
"#,
            id = ctx.id,
            title = title,
            deal = deal,
            created = created,
            author = ctx.author,
        )
    }
}
