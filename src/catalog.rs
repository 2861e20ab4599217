//! The fixed menu of analytical queries.
//!
//! Each entry pairs a display label with its SQL and, for chart-eligible
//! entries, the columns the bar chart is drawn from. Aggregates are rounded
//! numerics and every ordering is numeric.

/// Columns a chart-eligible entry plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    /// Column supplying the bar keys (one bar per row).
    pub x_column: &'static str,
    /// Column supplying the bar lengths; coerced to a number.
    pub y_column: &'static str,
    /// Column whose value annotates the tip of each bar.
    pub label_column: Option<&'static str>,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Position in the menu, starting at 1.
    pub number: usize,
    /// Display label; unique within the catalog.
    pub label: &'static str,
    pub sql: &'static str,
    pub chart: Option<ChartSpec>,
}

impl CatalogEntry {
    /// Returns true if the entry supports bar-chart rendering.
    pub fn has_chart(&self) -> bool {
        self.chart.is_some()
    }
}

/// Returns every entry, in menu order.
pub fn entries() -> &'static [CatalogEntry] {
    &CATALOG
}

/// Looks an entry up by its menu number.
pub fn get(number: usize) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.number == number)
}

/// Looks an entry up by its exact display label.
pub fn find(label: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.label == label)
}

static CATALOG: [CatalogEntry; 10] = [
    CatalogEntry {
        number: 1,
        label: "Query 1: Fornecedores que têm contratos ativos com valores totais acima da média \
                global de valores totais de contratos e que tem média de contratos ativos acima de 70%",
        sql: r#"
SELECT fornecedor.fornecedor_nome,
       ROUND(AVG(contrato.valor_global), 1) AS media_valor_total_contratos
FROM contrato NATURAL JOIN fornecedor
WHERE contrato.situacao = 'Ativo'
GROUP BY fornecedor.fornecedor_nome
HAVING AVG(contrato.valor_global) > (SELECT AVG(valor_global) FROM contrato)
   AND fornecedor.fornecedor_nome IN (
       SELECT fornecedor.fornecedor_nome
       FROM contrato NATURAL JOIN fornecedor
       GROUP BY fornecedor.fornecedor_nome
       HAVING SUM(CASE WHEN contrato.situacao = 'Ativo' THEN 1 ELSE 0 END) * 100.0
              / COUNT(contrato.contrato_id) > 70)
ORDER BY media_valor_total_contratos DESC;
"#,
        chart: Some(ChartSpec {
            x_column: "fornecedor_nome",
            y_column: "media_valor_total_contratos",
            label_column: None,
        }),
    },
    CatalogEntry {
        number: 2,
        label: "Query 2: Nome das unidades que não possuem contratos com duração abaixo da média \
                das durações de todos os contratos",
        sql: r#"
WITH contrato_tempo AS (
    SELECT contrato_id, unidade_codigo,
           JULIANDAY(vigencia_fim) - JULIANDAY(vigencia_inicio) AS tempo_contrato
    FROM contrato)
SELECT u.unidade_nome
FROM unidade AS u
WHERE u.unidade_codigo NOT IN (
    SELECT unidade_codigo FROM contrato_tempo
    WHERE tempo_contrato < (SELECT AVG(tempo_contrato) FROM contrato_tempo));
"#,
        chart: None,
    },
    CatalogEntry {
        number: 3,
        label: "Query 3: Nome dos 5 órgaos com a maior quantidade média de itens por contrato",
        sql: r#"
SELECT orgao.orgao_nome,
       ROUND(AVG(itemContrato.quantidade), 1) AS quantidade_media_itens
FROM orgao NATURAL JOIN contrato NATURAL JOIN itemContrato
GROUP BY orgao.orgao_nome
ORDER BY quantidade_media_itens DESC
LIMIT 5;
"#,
        chart: Some(ChartSpec {
            x_column: "orgao_nome",
            y_column: "quantidade_media_itens",
            label_column: None,
        }),
    },
    CatalogEntry {
        number: 4,
        label: "Query 4: Nome dos fornecedores com o maior valor total de contratos para cada tipo \
                de contrato",
        sql: r#"
WITH contratos_rank AS (
    SELECT fornecedor_nome,
           ROUND(SUM(contrato.valor_global), 1) AS total_valor_contratos,
           tipo_descricao,
           ROW_NUMBER() OVER (PARTITION BY tipo_descricao ORDER BY SUM(valor_global) DESC) AS posicao
    FROM contrato NATURAL JOIN fornecedor NATURAL JOIN tipo
    GROUP BY fornecedor_nome, tipo_descricao)
SELECT fornecedor_nome, total_valor_contratos, tipo_descricao
FROM contratos_rank
WHERE posicao = 1
ORDER BY total_valor_contratos DESC;
"#,
        chart: Some(ChartSpec {
            x_column: "fornecedor_nome",
            y_column: "total_valor_contratos",
            label_column: Some("tipo_descricao"),
        }),
    },
    CatalogEntry {
        number: 5,
        label: "Query 5: Porcentagem de contratos de cada tipo e as unidades que contem a maior \
                percentagem de contratos de cada tipo",
        sql: r#"
WITH percentual_contratos_tipo AS (
    SELECT tipo_descricao,
           COUNT(contrato_id) AS qtd_contratos,
           COUNT(contrato_id) * 100.0
               / (SELECT COUNT(*) FROM contrato WHERE situacao = 'Ativo') AS percentual_contratos_tipo
    FROM contrato NATURAL JOIN tipo
    WHERE situacao = 'Ativo'
    GROUP BY tipo_descricao),
ranked_unidades AS (
    SELECT tipo_descricao, unidade_nome,
           COUNT(contrato_id) AS qtd_contratos_unidade,
           COUNT(contrato_id) * 100.0
               / SUM(COUNT(contrato_id)) OVER (PARTITION BY tipo_codigo) AS percentual_contratos_tipo_unidade,
           ROW_NUMBER() OVER (PARTITION BY tipo_codigo ORDER BY COUNT(contrato_id) DESC) AS rank_unidades
    FROM contrato NATURAL JOIN unidade NATURAL JOIN tipo
    WHERE situacao = 'Ativo'
    GROUP BY tipo_descricao, unidade_nome)
SELECT tipo_descricao,
       percentual_contratos_tipo,
       unidade_nome AS unidade_maior_qtd_contratos,
       percentual_contratos_tipo_unidade
FROM percentual_contratos_tipo NATURAL JOIN ranked_unidades
WHERE rank_unidades = 1
ORDER BY percentual_contratos_tipo DESC;
"#,
        chart: Some(ChartSpec {
            x_column: "tipo_descricao",
            y_column: "percentual_contratos_tipo",
            label_column: Some("unidade_maior_qtd_contratos"),
        }),
    },
    CatalogEntry {
        number: 6,
        label: "Query 6: Nome do fornecedor, nome da unidade, data de início da vigência, data de \
                fim da vigência e o valor global de todos os contratos que pertençam a unidades da UFMG",
        sql: r#"
SELECT f.fornecedor_nome, u.unidade_nome, c.vigencia_inicio, c.vigencia_fim, c.valor_global
FROM fornecedor AS f
JOIN contrato AS c ON f.fornecedor_cnpj_cpf_idgener = c.fornecedor_cnpj_cpf_idgener
JOIN unidade AS u ON c.unidade_codigo = u.unidade_codigo
WHERE u.unidade_nome_resumido LIKE '%UFMG%';
"#,
        chart: None,
    },
    CatalogEntry {
        number: 7,
        label: "Query 7: Nome do órgão, número de contratos, valor total dos itens e média do valor \
                do item para cada órgão com mais de cinco contratos ativos e itens acima da média de valor",
        sql: r#"
SELECT o.orgao_nome,
       COUNT(c.contrato_id) AS numero_contratos,
       ROUND(SUM(ic.quantidade * i.item_valor), 1) AS valor_total,
       ROUND(AVG(i.item_valor), 2) AS media_valor_itens
FROM orgao AS o
JOIN contrato AS c ON o.orgao_codigo = c.orgao_codigo
JOIN itemContrato AS ic ON c.contrato_id = ic.contrato_id
JOIN item AS i ON ic.item_id = i.item_id
WHERE c.situacao = 'Ativo'
  AND i.item_valor > (SELECT AVG(item_valor) FROM item)
GROUP BY o.orgao_nome
HAVING COUNT(DISTINCT c.contrato_id) > 5
ORDER BY valor_total DESC, media_valor_itens DESC;
"#,
        chart: Some(ChartSpec {
            x_column: "orgao_nome",
            y_column: "valor_total",
            label_column: Some("numero_contratos"),
        }),
    },
    CatalogEntry {
        number: 8,
        label: "Query 8: Para cada tipo de contrato seleciona a quantidade, valor total, quantidade \
                de itens e o preço médio de cada item",
        sql: r#"
WITH total_contrato_tipo AS (
    SELECT t.tipo_descricao,
           COUNT(c.contrato_id) AS qtd_contratos,
           SUM(c.valor_global) AS total_valor_contratos
    FROM tipo AS t
    JOIN contrato AS c ON t.tipo_codigo = c.tipo_codigo
    WHERE c.situacao = 'Ativo'
    GROUP BY t.tipo_descricao),
itens_tipo AS (
    SELECT t.tipo_descricao,
           COUNT(i.quantidade) AS qtd_itens,
           AVG(i.valortotal) AS media_valor_por_item
    FROM tipo AS t
    JOIN contrato AS c ON t.tipo_codigo = c.tipo_codigo
    JOIN itemContrato AS i ON c.contrato_id = i.contrato_id
    WHERE c.situacao = 'Ativo'
    GROUP BY t.tipo_descricao)
SELECT tc.tipo_descricao,
       tc.qtd_contratos,
       ROUND(tc.total_valor_contratos, 1) AS total_valor_contratos,
       it.qtd_itens,
       ROUND(it.media_valor_por_item, 1) AS media_valor_por_item
FROM total_contrato_tipo AS tc
JOIN itens_tipo AS it ON tc.tipo_descricao = it.tipo_descricao
ORDER BY tc.qtd_contratos DESC;
"#,
        chart: None,
    },
    CatalogEntry {
        number: 9,
        label: "Query 9: Nome da unidade e o custo total de todos os itens da unidade",
        sql: r#"
SELECT u.unidade_nome,
       ROUND(SUM(ic.quantidade * i.item_valor), 1) AS custo_total
FROM item AS i
JOIN itemContrato AS ic ON i.item_id = ic.item_id
JOIN contrato AS c ON ic.contrato_id = c.contrato_id
JOIN unidade AS u ON c.unidade_codigo = u.unidade_codigo
WHERE ic.quantidade > 0 AND i.item_valor > 0
GROUP BY u.unidade_nome
ORDER BY custo_total DESC;
"#,
        chart: Some(ChartSpec {
            x_column: "unidade_nome",
            y_column: "custo_total",
            label_column: None,
        }),
    },
    CatalogEntry {
        number: 10,
        label: "Query 10: Os 20 fornecedores com o maior número de contratos ativos",
        sql: r#"
SELECT f.fornecedor_nome,
       COUNT(c.fornecedor_cnpj_cpf_idgener) AS numero_contratos
FROM fornecedor AS f
JOIN contrato AS c ON f.fornecedor_cnpj_cpf_idgener = c.fornecedor_cnpj_cpf_idgener
WHERE c.situacao = 'Ativo'
GROUP BY f.fornecedor_nome
ORDER BY numero_contratos DESC
LIMIT 20;
"#,
        chart: Some(ChartSpec {
            x_column: "fornecedor_nome",
            y_column: "numero_contratos",
            label_column: None,
        }),
    },
];
