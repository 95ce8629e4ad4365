use crate::error::{ApoteoError, Result};
use crate::models::Row;

// ---------------------------------------------------------------------------
// Funding sources and concept vocabulary
// ---------------------------------------------------------------------------

pub const SOURCE_SGP_CSF: &str = "SGP Prest. Serv. Nómina Educació";
pub const SOURCE_SGP_SSF: &str = "SGP PRESTACION DEL.SERVICIO SSF";
pub const SOURCE_OWN: &str = "Otros Distrito Inversión";

// Concept labels exactly as they appear in the export.
const SUELDO_BASICO: &str = "O231010100101 Sueldo básico";
const HORAS_EXTRAS: &str = "O231010100102 Horas extras, dominicales, festivos y recargos";
const SUBSIDIO_ALIMENTACION: &str = "O231010100104 Subsidio de alimentación";
const AUXILIO_TRANSPORTE: &str = "O231010100105 Auxilio de Transporte";
const PRIMA_SERVICIO: &str = "O231010100106 Prima de servicio";
const BONIFICACION_SERVICIOS: &str = "O231010100107 Bonificación por servicios prestados";
const PRIMA_TECNICA: &str = "O231010100109 Prima técnica salarial";
const PRIMA_SEMESTRAL: &str = "O231010100204 Prima semestral";
const PRIMA_NAVIDAD: &str = "O23101010010801 Prima de navidad";
const PRIMA_VACACIONES: &str = "O23101010010802 Prima de vacaciones";
const BENEFICIOS_CORTO_PLAZO: &str = "O23101010021201 Beneficios a los empleados a corto plazo";
const BONIFICACION_RECREACION: &str = "O231010300103 Bonificación especial de recreación";
const PRIMA_SECRETARIAL: &str = "O2310103068 Prima secretarial";
const COMPENSAR: &str = "O231010200401 Compensar";
const ICBF: &str = "O2310102006 Aportes al ICBF";
const SENA: &str = "O2310102007 Aportes al SENA";
const ESAP: &str = "O2310102008 Aportes a la ESAP";
const ESCUELAS_TECNICAS: &str =
    "O2310102009 Aportes a escuelas industriales e institutos técnicos";
const PENSIONES_PUBLICAS: &str =
    "O231010200101 Aportes a la seguridad social en pensiones públicas";
const PENSIONES_PRIVADAS: &str =
    "O231010200102 Aportes a la seguridad social en pensiones privadas";
const SALUD_PUBLICA: &str = "O231010200201 Aportes a la seguridad social en salud pública";
const SALUD_PRIVADA: &str = "O231010200202 Aportes a la seguridad social en salud privada";
const CESANTIAS_PUBLICAS: &str = "O231010200301 Aportes de cesantías a fondos públicos";
const CESANTIAS_PRIVADAS: &str = "O231010200302 Aportes de cesantías a fondos privados";
const RIESGOS_LABORALES: &str =
    "O231010200502 Aportes generales al sistema de riesgos laborales privados";
const MULTAS_JUDICIALES: &str = "O2380501002 Multas judiciales";

// Closed vocabularies, one per leaf bucket of the funding-source summary.

const CSF_CONCEPTS: &[&str] = &[
    SUELDO_BASICO,
    HORAS_EXTRAS,
    SUBSIDIO_ALIMENTACION,
    AUXILIO_TRANSPORTE,
    PRIMA_SERVICIO,
    PRIMA_NAVIDAD,
    PRIMA_VACACIONES,
    COMPENSAR,
    ICBF,
    SENA,
    ESAP,
    ESCUELAS_TECNICAS,
];

const CSF_FOMAG_CONCEPTS: &[&str] = &[SALUD_PUBLICA, PENSIONES_PUBLICAS];

const SSF_EMPLOYEE_CONCEPTS: &[&str] = &[SUELDO_BASICO];

const SSF_EMPLOYER_CONCEPTS: &[&str] = &[SALUD_PUBLICA, CESANTIAS_PUBLICAS];

const ADMIN_SGP_CONCEPTS: &[&str] = &[
    SUELDO_BASICO,
    PRIMA_SEMESTRAL,
    PRIMA_VACACIONES,
    PRIMA_NAVIDAD,
    BONIFICACION_SERVICIOS,
    PRIMA_TECNICA,
    BENEFICIOS_CORTO_PLAZO,
    BONIFICACION_RECREACION,
    PRIMA_SECRETARIAL,
    COMPENSAR,
    ICBF,
    ESCUELAS_TECNICAS,
    SENA,
    ESAP,
    SALUD_PRIVADA,
    PENSIONES_PRIVADAS,
    PENSIONES_PUBLICAS,
    RIESGOS_LABORALES,
    CESANTIAS_PRIVADAS,
    CESANTIAS_PUBLICAS,
];

const DOC_REC_PROPIOS_CONCEPTS: &[&str] = &[
    SUELDO_BASICO,
    HORAS_EXTRAS,
    SUBSIDIO_ALIMENTACION,
    AUXILIO_TRANSPORTE,
    PRIMA_SERVICIO,
    PRIMA_NAVIDAD,
    PRIMA_VACACIONES,
    PENSIONES_PUBLICAS,
    SALUD_PUBLICA,
    CESANTIAS_PUBLICAS,
    COMPENSAR,
    ICBF,
    SENA,
    ESAP,
    ESCUELAS_TECNICAS,
];

const ADTIVOS_REC_PROP_CONCEPTS: &[&str] = &[
    SUELDO_BASICO,
    SUBSIDIO_ALIMENTACION,
    AUXILIO_TRANSPORTE,
    BONIFICACION_SERVICIOS,
    PRIMA_NAVIDAD,
    PRIMA_VACACIONES,
    PRIMA_TECNICA,
    PRIMA_SEMESTRAL,
    BENEFICIOS_CORTO_PLAZO,
    PENSIONES_PUBLICAS,
    PENSIONES_PRIVADAS,
    SALUD_PRIVADA,
    CESANTIAS_PRIVADAS,
    CESANTIAS_PUBLICAS,
    COMPENSAR,
    RIESGOS_LABORALES,
    ICBF,
    SENA,
    ESAP,
    ESCUELAS_TECNICAS,
    BONIFICACION_RECREACION,
];

const SENTENCIAS_CONCEPTS: &[&str] = &[MULTAS_JUDICIALES];

// ---------------------------------------------------------------------------
// Rule records
// ---------------------------------------------------------------------------

/// Condition on the two-digit range key. An absent key (`None`) never
/// satisfies a bounded filter; only `Any` accepts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeFilter {
    Any,
    Below(u32),
    AtMost(u32),
    Between(u32, u32),
}

impl RangeFilter {
    pub fn matches(&self, key: Option<u32>) -> bool {
        match (*self, key) {
            (RangeFilter::Any, _) => true,
            (_, None) => false,
            (RangeFilter::Below(n), Some(k)) => k < n,
            (RangeFilter::AtMost(n), Some(k)) => k <= n,
            (RangeFilter::Between(lo, hi), Some(k)) => k >= lo && k <= hi,
        }
    }
}

/// A leaf bucket: predicate conjunction over funding source, concept
/// vocabulary and range key.
#[derive(Debug, Clone)]
pub struct LeafRule {
    pub name: &'static str,
    pub source: &'static str,
    pub concepts: &'static [&'static str],
    pub range: RangeFilter,
}

impl LeafRule {
    pub fn matches(&self, row: &Row) -> bool {
        row.source == self.source
            && self.concepts.contains(&row.concept.as_str())
            && self.range.matches(row.range_key)
    }
}

/// A roll-up bucket: field-wise sum of previously declared buckets.
#[derive(Debug, Clone)]
pub struct Rollup {
    pub name: &'static str,
    pub parts: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub enum BucketDef {
    Leaf(LeafRule),
    Rollup(Rollup),
}

impl BucketDef {
    pub fn name(&self) -> &'static str {
        match self {
            BucketDef::Leaf(l) => l.name,
            BucketDef::Rollup(r) => r.name,
        }
    }
}

/// Ordered bucket definitions for one report. Roll-ups may only reference
/// buckets declared before them.
#[derive(Debug, Clone)]
pub struct ReportDef {
    pub title: String,
    pub buckets: Vec<BucketDef>,
}

fn leaf(
    name: &'static str,
    source: &'static str,
    concepts: &'static [&'static str],
    range: RangeFilter,
) -> BucketDef {
    BucketDef::Leaf(LeafRule {
        name,
        source,
        concepts,
        range,
    })
}

fn rollup(name: &'static str, parts: &'static [&'static str]) -> BucketDef {
    BucketDef::Rollup(Rollup { name, parts })
}

// ---------------------------------------------------------------------------
// Funding-source summary
// ---------------------------------------------------------------------------

/// The main execution summary: SGP buckets, own-resources buckets, and the
/// P8033 roll-up chain ending at the cross-source grand total.
pub fn funding_summary() -> ReportDef {
    ReportDef {
        title: "TABLA RESUMEN EJECUCIÓN PRESUPUESTAL - SGP".to_string(),
        buckets: vec![
            leaf(
                "SGP CSF (Salarios + Parafiscales)",
                SOURCE_SGP_CSF,
                CSF_CONCEPTS,
                RangeFilter::Below(65),
            ),
            leaf(
                "SGP SSF FOMAG (Empleado)",
                SOURCE_SGP_SSF,
                SSF_EMPLOYEE_CONCEPTS,
                RangeFilter::Below(65),
            ),
            leaf(
                "SGP SSF FOMAG (Patrón)",
                SOURCE_SGP_SSF,
                SSF_EMPLOYER_CONCEPTS,
                RangeFilter::Below(65),
            ),
            leaf(
                "SGP CSF FOMAG",
                SOURCE_SGP_CSF,
                CSF_FOMAG_CONCEPTS,
                RangeFilter::Below(65),
            ),
            rollup(
                "TOTAL SGP DOCENTES",
                &[
                    "SGP CSF (Salarios + Parafiscales)",
                    "SGP SSF FOMAG (Empleado)",
                    "SGP SSF FOMAG (Patrón)",
                    "SGP CSF FOMAG",
                ],
            ),
            leaf(
                "Administrativos SGP",
                SOURCE_SGP_CSF,
                ADMIN_SGP_CONCEPTS,
                RangeFilter::Between(65, 86),
            ),
            rollup(
                "TOTAL SGP P8033",
                &["TOTAL SGP DOCENTES", "Administrativos SGP"],
            ),
            leaf(
                "DOC REC PROPIOS",
                SOURCE_OWN,
                DOC_REC_PROPIOS_CONCEPTS,
                RangeFilter::AtMost(57),
            ),
            leaf(
                "ADTIVOS REC PROP",
                SOURCE_OWN,
                ADTIVOS_REC_PROP_CONCEPTS,
                RangeFilter::Between(65, 86),
            ),
            leaf(
                "SENTENCIAS",
                SOURCE_OWN,
                SENTENCIAS_CONCEPTS,
                RangeFilter::Any,
            ),
            rollup(
                "TOTAL RECURSOS PROPIOS P8033",
                &["DOC REC PROPIOS", "ADTIVOS REC PROP", "SENTENCIAS"],
            ),
            rollup(
                "TOTAL SGP+RP P8033",
                &["TOTAL SGP P8033", "TOTAL RECURSOS PROPIOS P8033"],
            ),
        ],
    }
}

/// The summary row every executive metric is computed against.
pub const GRAND_TOTAL: &str = "TOTAL SGP+RP P8033";

// ---------------------------------------------------------------------------
// Own-resources detail, by organizational band
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    Total,
    PrimeraInfancia,
    Orientadores,
    Global,
}

impl Band {
    pub const ALL: [Band; 4] = [
        Band::Total,
        Band::PrimeraInfancia,
        Band::Orientadores,
        Band::Global,
    ];

    pub fn parse(s: &str) -> Result<Band> {
        match s.to_lowercase().as_str() {
            "total" => Ok(Band::Total),
            "primera-infancia" => Ok(Band::PrimeraInfancia),
            "orientadores" => Ok(Band::Orientadores),
            "global" => Ok(Band::Global),
            _ => Err(ApoteoError::UnknownBand(s.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::Total => "TOTAL",
            Band::PrimeraInfancia => "PRIMERA INFANCIA",
            Band::Orientadores => "ORIENTADORES",
            Band::Global => "GLOBAL",
        }
    }

    pub fn range(&self) -> RangeFilter {
        match self {
            Band::Total => RangeFilter::Below(65),
            Band::PrimeraInfancia => RangeFilter::Between(1, 19),
            Band::Orientadores => RangeFilter::Between(20, 32),
            Band::Global => RangeFilter::Between(33, 57),
        }
    }

    fn total_name(&self) -> &'static str {
        match self {
            Band::Total => "DOC REC PROPIOS",
            Band::PrimeraInfancia => "PRIMERA INFANCIA REC PROPIOS",
            Band::Orientadores => "ORIENTADORES REC PROPIOS",
            Band::Global => "GLOBAL REC PROPIOS",
        }
    }
}

const PAYROLL_LEAVES: &[(&str, &[&str])] = &[
    ("SUELDO BASICO", &[SUELDO_BASICO]),
    ("HORAS EXTRAS", &[HORAS_EXTRAS]),
    ("SUBSIDIO DE ALIMENTACIÓN", &[SUBSIDIO_ALIMENTACION]),
    ("AUXILIO DE TRANSPORTE", &[AUXILIO_TRANSPORTE]),
    ("PRIMA DE SERVICIOS", &[PRIMA_SERVICIO]),
    ("PRIMA DE VACACIONES", &[PRIMA_VACACIONES]),
    ("PRIMA DE NAVIDAD", &[PRIMA_NAVIDAD]),
];

const PARAFISCAL_LEAVES: &[(&str, &[&str])] = &[
    ("COMPENSAR", &[COMPENSAR]),
    ("ICBF", &[ICBF]),
    ("SENA", &[SENA]),
    ("ESAP", &[ESAP]),
    ("ESCUELAS TÉCNICAS", &[ESCUELAS_TECNICAS]),
];

const FOMAG_LEAVES: &[(&str, &[&str])] = &[
    ("SALUD", &[SALUD_PUBLICA]),
    ("PENSIÓN", &[PENSIONES_PUBLICAS]),
    ("CESANTÍAS", &[CESANTIAS_PUBLICAS]),
];

const PAYROLL_TOTAL_PARTS: &[&str] = &[
    "SUELDO BASICO",
    "HORAS EXTRAS",
    "SUBSIDIO DE ALIMENTACIÓN",
    "AUXILIO DE TRANSPORTE",
    "PRIMA DE SERVICIOS",
    "PRIMA DE VACACIONES",
    "PRIMA DE NAVIDAD",
];

const PARAFISCAL_TOTAL_PARTS: &[&str] =
    &["COMPENSAR", "ICBF", "SENA", "ESAP", "ESCUELAS TÉCNICAS"];

const FOMAG_TOTAL_PARTS: &[&str] = &["SALUD", "PENSIÓN", "CESANTÍAS"];

const OWN_TOTAL_PARTS: &[&str] = &["SUELDOS", "TOTAL PARAFISCALES", "TOTAL FOMAG"];

/// Per-concept own-resources breakdown for one band: payroll, parafiscal
/// and FOMAG pass-through leaves with their group roll-ups and the band
/// grand total.
pub fn own_resources(band: Band) -> ReportDef {
    let range = band.range();
    let mut buckets = Vec::new();

    for &(name, concepts) in PAYROLL_LEAVES {
        buckets.push(leaf(name, SOURCE_OWN, concepts, range));
    }
    buckets.push(rollup("SUELDOS", PAYROLL_TOTAL_PARTS));

    for &(name, concepts) in PARAFISCAL_LEAVES {
        buckets.push(leaf(name, SOURCE_OWN, concepts, range));
    }
    buckets.push(rollup("TOTAL PARAFISCALES", PARAFISCAL_TOTAL_PARTS));

    for &(name, concepts) in FOMAG_LEAVES {
        buckets.push(leaf(name, SOURCE_OWN, concepts, range));
    }
    buckets.push(rollup("TOTAL FOMAG", FOMAG_TOTAL_PARTS));

    buckets.push(rollup(band.total_name(), OWN_TOTAL_PARTS));

    ReportDef {
        title: format!("{} - RECURSOS PROPIOS", band.label()),
        buckets,
    }
}

/// Roll-up names of the own-resources reports, used by the renderer to
/// collapse the table when details are hidden.
pub fn own_resources_rollups(band: Band) -> Vec<&'static str> {
    vec![
        "SUELDOS",
        "TOTAL PARAFISCALES",
        "TOTAL FOMAG",
        band.total_name(),
    ]
}
