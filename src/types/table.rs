//! # Table Catalog
//!
//! Static, hand-authored description of the marketplace tables.
//!
//! The catalog is the single place where column names, SQL types and
//! constraints are declared. The query builders read column lists and
//! foreign keys from here, the in-memory store enforces the constraints
//! declared here and the `/schema` endpoint renders it.
//!
//! Nothing in this module is derived from the database: when the schema
//! changes, this file must be updated accordingly.

use std::fmt;

/// Tables of the marketplace schema, in dump order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Clientes,
    Freelancers,
    Proyectos,
    Habilidades,
    Aplicaciones,
    FreelancerHabilidad,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Clientes,
        Table::Freelancers,
        Table::Proyectos,
        Table::Habilidades,
        Table::Aplicaciones,
        Table::FreelancerHabilidad,
    ];

    pub fn name(&self) -> &'static str {
        self.def().name
    }

    pub fn def(&self) -> &'static TableDef {
        match self {
            Table::Clientes => &CLIENTES,
            Table::Freelancers => &FREELANCERS,
            Table::Proyectos => &PROYECTOS,
            Table::Habilidades => &HABILIDADES,
            Table::Aplicaciones => &APLICACIONES,
            Table::FreelancerHabilidad => &FREELANCER_HABILIDAD,
        }
    }

    pub fn columns(&self) -> &'static [ColumnDef] {
        self.def().columns
    }

    pub fn column(&self, name: &str) -> Option<&'static ColumnDef> {
        self.columns().iter().find(|c| c.name == name)
    }

    /// Primary key columns (more than one for association tables)
    pub fn primary_key(&self) -> impl Iterator<Item = &'static ColumnDef> {
        self.columns().iter().filter(|c| c.primary_key)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Varchar,
    Text,
    Numeric,
    Timestamp,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Integer => "integer",
            SqlType::Varchar => "varchar",
            SqlType::Text => "text",
            SqlType::Numeric => "numeric",
            SqlType::Timestamp => "timestamp",
        }
    }
}

/// Value assigned by the store when a column is omitted on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Now,
}

#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: &'static [ColumnDef],
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
    /// Value generated by the store (serial / identity)
    pub auto: bool,
    pub references: Option<Table>,
    pub not_null: bool,
    pub unique: bool,
    pub default: Option<DefaultValue>,
    /// Enumerated values accepted by a `CHECK` constraint, empty if unrestricted
    pub allowed: &'static [&'static str],
}

impl ColumnDef {
    const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            primary_key: false,
            auto: false,
            references: None,
            not_null: false,
            unique: false,
            default: None,
            allowed: &[],
        }
    }

    const fn pk(self) -> Self {
        Self {
            primary_key: true,
            ..self
        }
    }

    const fn auto(self) -> Self {
        Self { auto: true, ..self }
    }

    const fn fk(self, table: Table) -> Self {
        Self {
            references: Some(table),
            ..self
        }
    }

    const fn not_null(self) -> Self {
        Self {
            not_null: true,
            ..self
        }
    }

    const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    const fn default_now(self) -> Self {
        Self {
            default: Some(DefaultValue::Now),
            ..self
        }
    }

    const fn one_of(self, allowed: &'static [&'static str]) -> Self {
        Self { allowed, ..self }
    }

    /// Whether the store rejects a `NULL` in this column.
    pub fn rejects_null(&self) -> bool {
        self.not_null || self.primary_key
    }

    /// Human readable column description, e.g. `integer (PK, FK -> freelancers)`.
    pub fn describe(&self) -> String {
        let mut notes: Vec<String> = Vec::new();

        if self.primary_key {
            notes.push("PK".to_owned());
        }
        if self.auto {
            notes.push("auto".to_owned());
        }
        if let Some(table) = self.references {
            notes.push(format!("FK -> {table}"));
        }
        if self.not_null {
            notes.push("NOT NULL".to_owned());
        }
        if self.unique {
            notes.push("UNIQUE".to_owned());
        }
        if let Some(DefaultValue::Now) = self.default {
            notes.push("default: NOW()".to_owned());
        }
        if !self.allowed.is_empty() {
            notes.push(self.allowed.join(", "));
        }

        if notes.is_empty() {
            self.sql_type.as_sql().to_owned()
        } else {
            format!("{} ({})", self.sql_type.as_sql(), notes.join(", "))
        }
    }
}

static CLIENTES: TableDef = TableDef {
    name: "clientes",
    description: "Clientes que publican proyectos",
    columns: &[
        ColumnDef::new("id_cliente", SqlType::Integer).pk().auto(),
        ColumnDef::new("nombre", SqlType::Varchar).not_null(),
        ColumnDef::new("correo", SqlType::Varchar).not_null().unique(),
        ColumnDef::new("telefono", SqlType::Varchar),
        ColumnDef::new("contrasena", SqlType::Varchar).not_null(),
    ],
};

static FREELANCERS: TableDef = TableDef {
    name: "freelancers",
    description: "Freelancers disponibles",
    columns: &[
        ColumnDef::new("id_freelancer", SqlType::Integer).pk().auto(),
        ColumnDef::new("nombre", SqlType::Varchar).not_null(),
        ColumnDef::new("telefono", SqlType::Varchar),
        ColumnDef::new("correo", SqlType::Varchar).not_null().unique(),
        ColumnDef::new("contrasena", SqlType::Varchar).not_null(),
        ColumnDef::new("biografia", SqlType::Text),
        ColumnDef::new("fecha_registro", SqlType::Timestamp).default_now(),
    ],
};

static PROYECTOS: TableDef = TableDef {
    name: "proyectos",
    description: "Proyectos publicados por clientes",
    columns: &[
        ColumnDef::new("id_proyecto", SqlType::Integer).pk().auto(),
        ColumnDef::new("titulo", SqlType::Varchar).not_null(),
        ColumnDef::new("descripcion", SqlType::Text),
        ColumnDef::new("presupuesto", SqlType::Numeric),
        ColumnDef::new("id_cliente", SqlType::Integer).fk(Table::Clientes),
        ColumnDef::new("fecha_publicacion", SqlType::Timestamp).default_now(),
        ColumnDef::new("estado", SqlType::Varchar).one_of(&["activo", "cerrado", "en_progreso"]),
    ],
};

static HABILIDADES: TableDef = TableDef {
    name: "habilidades",
    description: "Catálogo de habilidades",
    columns: &[
        ColumnDef::new("id_habilidad", SqlType::Integer).pk().auto(),
        ColumnDef::new("nombre", SqlType::Varchar).not_null(),
    ],
};

static APLICACIONES: TableDef = TableDef {
    name: "aplicaciones",
    description: "Aplicaciones de freelancers a proyectos",
    columns: &[
        ColumnDef::new("id_aplicacion", SqlType::Integer).pk().auto(),
        ColumnDef::new("id_freelancer", SqlType::Integer).fk(Table::Freelancers),
        ColumnDef::new("id_proyecto", SqlType::Integer).fk(Table::Proyectos),
        ColumnDef::new("estado", SqlType::Varchar).one_of(&["pendiente", "aceptado", "rechazado"]),
        ColumnDef::new("mensaje_propuesta", SqlType::Text),
    ],
};

static FREELANCER_HABILIDAD: TableDef = TableDef {
    name: "freelancer_habilidad",
    description: "Relación freelancers-habilidades",
    columns: &[
        ColumnDef::new("id_freelancer", SqlType::Integer)
            .pk()
            .fk(Table::Freelancers),
        ColumnDef::new("id_habilidad", SqlType::Integer)
            .pk()
            .fk(Table::Habilidades),
        ColumnDef::new("anios_experiencia", SqlType::Integer),
        ColumnDef::new("nivel", SqlType::Varchar).one_of(&["bajo", "intermedio", "avanzado"]),
    ],
};

/// How an embedded table is reached from a base table, one hop along a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The base table holds `fk`, referencing `target_pk` on the embedded table.
    /// Embeds as a single object (or `null`).
    ManyToOne {
        fk: &'static str,
        target_pk: &'static str,
    },
    /// The embedded table holds `fk`, referencing `base_pk` on the base table.
    /// Embeds as an array.
    OneToMany {
        fk: &'static str,
        base_pk: &'static str,
    },
}

/// Resolves the relation used to embed `target` rows into `base` rows.
pub fn relation(base: Table, target: Table) -> Option<Relation> {
    if let Some(fk) = base.columns().iter().find(|c| c.references == Some(target)) {
        let target_pk = target.primary_key().next()?;
        return Some(Relation::ManyToOne {
            fk: fk.name,
            target_pk: target_pk.name,
        });
    }

    if let Some(fk) = target.columns().iter().find(|c| c.references == Some(base)) {
        let base_pk = base.primary_key().next()?;
        return Some(Relation::OneToMany {
            fk: fk.name,
            base_pk: base_pk.name,
        });
    }

    None
}
