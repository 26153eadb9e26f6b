//! Tool definitions offered to the model

use serde_json::{json, Value};

use crate::types::Tool;

/// The Tushare-backed functions a model can call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TushareFunction {
    ConceptSectorDaily,
    ConceptSectorMembers,
    IndexDaily,
    StockDailyBasic,
    StockDaily,
    LimitList,
    TopList,
    Moneyflow,
}

impl TushareFunction {
    pub const ALL: [TushareFunction; 8] = [
        TushareFunction::ConceptSectorDaily,
        TushareFunction::ConceptSectorMembers,
        TushareFunction::IndexDaily,
        TushareFunction::StockDailyBasic,
        TushareFunction::StockDaily,
        TushareFunction::LimitList,
        TushareFunction::TopList,
        TushareFunction::Moneyflow,
    ];

    /// Function name as seen by the model
    pub fn name(&self) -> &'static str {
        match self {
            TushareFunction::ConceptSectorDaily => "get_concept_sector_daily",
            TushareFunction::ConceptSectorMembers => "get_concept_sector_members",
            TushareFunction::IndexDaily => "get_index_daily",
            TushareFunction::StockDailyBasic => "get_stock_daily_basic",
            TushareFunction::StockDaily => "get_stock_daily",
            TushareFunction::LimitList => "get_limit_list",
            TushareFunction::TopList => "get_top_list",
            TushareFunction::Moneyflow => "get_moneyflow",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Tushare Pro API behind the function
    pub fn api_name(&self) -> &'static str {
        match self {
            TushareFunction::ConceptSectorDaily => "ths_daily",
            TushareFunction::ConceptSectorMembers => "ths_member",
            TushareFunction::IndexDaily => "index_daily",
            TushareFunction::StockDailyBasic => "daily_basic",
            TushareFunction::StockDaily => "daily",
            TushareFunction::LimitList => "limit_list_d",
            TushareFunction::TopList => "top_list",
            TushareFunction::Moneyflow => "moneyflow",
        }
    }

    /// Requested columns; empty means the API default
    pub fn fields(&self) -> &'static str {
        match self {
            TushareFunction::ConceptSectorDaily => {
                "ts_code,trade_date,open,close,high,low,pct_change,vol,turnover_rate"
            }
            TushareFunction::ConceptSectorMembers => "",
            TushareFunction::IndexDaily => "",
            TushareFunction::StockDailyBasic => concat!(
                "ts_code,trade_date,close,turnover_rate,turnover_rate_f,",
                "volume_ratio,pe,pe_ttm,pb,ps,ps_ttm,",
                "dv_ratio,dv_ttm,total_share,float_share,free_share,",
                "total_mv,circ_mv"
            ),
            TushareFunction::StockDaily => "",
            TushareFunction::LimitList => concat!(
                "ts_code,trade_date,name,close,pct_chg,amp,",
                "fc_ratio,fl_ratio,fd_amount,first_time,last_time,",
                "open_times,strth,limit"
            ),
            TushareFunction::TopList => concat!(
                "ts_code,trade_date,name,close,pct_change,turnover_rate,",
                "amount,l_sell,l_buy,l_amount,net_amount,net_rate,amount_rate,",
                "float_values,reason"
            ),
            TushareFunction::Moneyflow => concat!(
                "ts_code,trade_date,",
                "buy_sm_amount,sell_sm_amount,buy_md_amount,sell_md_amount,",
                "buy_lg_amount,sell_lg_amount,buy_elg_amount,sell_elg_amount,",
                "net_mf_amount"
            ),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TushareFunction::ConceptSectorDaily => concat!(
                "获取同花顺概念板块日线行情数据，包括涨跌幅、成交量、换手率等。",
                "可按板块代码和日期查询。板块代码来自概念板块列表（如 885311.TI）。"
            ),
            TushareFunction::ConceptSectorMembers => concat!(
                "获取同花顺概念板块的成分股列表，返回板块包含的所有个股代码和名称。",
                "可用于了解板块内有哪些龙头股。"
            ),
            TushareFunction::IndexDaily => concat!(
                "获取大盘指数日线行情数据，包括开盘、收盘、最高、最低、涨跌幅、成交量等。",
                "常用指数代码：000001.SH（上证指数）、399001.SZ（深证成指）、399006.SZ（创业板指）。"
            ),
            TushareFunction::StockDailyBasic => concat!(
                "获取个股每日重要指标，包括换手率、量比、市盈率（PE/PE_TTM）、市净率（PB）、",
                "股息率、总市值、流通市值等。可按股票代码或交易日期查询。"
            ),
            TushareFunction::StockDaily => concat!(
                "获取个股日线行情数据，包括开盘、收盘、最高、最低、昨收、涨跌幅、成交量、成交额。",
                "用于判断个股当日涨跌幅度、是否接近涨停、量能变化等。"
            ),
            TushareFunction::LimitList => concat!(
                "获取每日涨跌停股票列表，包括封单比、封单额、首次封板时间、开板次数、",
                "涨停强度等。用于查看当日哪些股票涨停/跌停及其封板质量。"
            ),
            TushareFunction::TopList => concat!(
                "获取龙虎榜每日明细数据，包括上榜原因、买入额、卖出额、净买入额、",
                "成交额占比等。可查看当日哪些股票上了龙虎榜及主力资金动向。"
            ),
            TushareFunction::Moneyflow => concat!(
                "获取个股资金流向数据，包括大单、中单、小单的买入卖出金额和净流入。",
                "用于判断主力资金是否在流入或流出某只股票。"
            ),
        }
    }

    /// JSON Schema of the function's arguments
    pub fn parameters(&self) -> Value {
        let sector_code = json!({
            "type": "string",
            "description": "概念板块代码，如 885311.TI（智能电网）。来自概念板块列表。",
        });
        let stock_code = json!({
            "type": "string",
            "description": "股票代码，如 000001.SZ（平安银行）、600519.SH（贵州茅台）。",
        });
        let trade_date = json!({
            "type": "string",
            "description": "交易日期，YYYYMMDD 格式。不填则返回最近交易日数据。",
        });

        match self {
            TushareFunction::ConceptSectorDaily => json!({
                "type": "object",
                "properties": {
                    "ts_code": sector_code,
                    "trade_date": {
                        "type": "string",
                        "description": "交易日期，YYYYMMDD 格式，如 20260214。不填则返回最近交易日数据。",
                    },
                },
                "required": [],
            }),
            TushareFunction::ConceptSectorMembers => json!({
                "type": "object",
                "properties": { "ts_code": sector_code },
                "required": ["ts_code"],
            }),
            TushareFunction::IndexDaily => json!({
                "type": "object",
                "properties": {
                    "ts_code": {
                        "type": "string",
                        "description": concat!(
                            "指数代码。常用：000001.SH（上证指数）、399001.SZ（深证成指）、",
                            "399006.SZ（创业板指）、399300.SZ（沪深300）。"
                        ),
                    },
                    "trade_date": trade_date,
                },
                "required": ["ts_code"],
            }),
            TushareFunction::StockDailyBasic | TushareFunction::StockDaily => json!({
                "type": "object",
                "properties": {
                    "ts_code": stock_code,
                    "trade_date": trade_date,
                },
                "required": ["ts_code"],
            }),
            TushareFunction::LimitList => json!({
                "type": "object",
                "properties": {
                    "trade_date": trade_date,
                    "limit_type": {
                        "type": "string",
                        "description": "涨跌停类型：U=涨停，D=跌停，Z=炸板。不填则返回全部。",
                        "enum": ["U", "D", "Z"],
                    },
                    "ts_code": {
                        "type": "string",
                        "description": "股票代码，可选。填写则只返回该股票的涨跌停信息。",
                    },
                },
                "required": [],
            }),
            TushareFunction::TopList => json!({
                "type": "object",
                "properties": {
                    "trade_date": trade_date,
                    "ts_code": {
                        "type": "string",
                        "description": "股票代码，可选。填写则只返回该股票的龙虎榜信息。",
                    },
                },
                "required": [],
            }),
            TushareFunction::Moneyflow => json!({
                "type": "object",
                "properties": {
                    "ts_code": {
                        "type": "string",
                        "description": "股票代码，如 000001.SZ（平安银行）。",
                    },
                    "trade_date": trade_date,
                },
                "required": ["ts_code"],
            }),
        }
    }

    pub fn tool(&self) -> Tool {
        Tool::new(self.name(), self.description()).with_schema(self.parameters())
    }
}

impl std::fmt::Display for TushareFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The eight Tushare tools, in a stable order
pub fn tushare_tools() -> Vec<Tool> {
    TushareFunction::ALL.iter().map(TushareFunction::tool).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for function in TushareFunction::ALL {
            assert_eq!(TushareFunction::from_name(function.name()), Some(function));
        }
        assert_eq!(TushareFunction::from_name("get_weather"), None);
    }

    #[test]
    fn test_tool_schemas() {
        let tools = tushare_tools();
        assert_eq!(tools.len(), 8);
        assert_eq!(tools[0].name, "get_concept_sector_daily");

        let members = &tools[1];
        assert_eq!(members.parameters["required"][0], "ts_code");

        let limit = TushareFunction::LimitList.tool();
        assert_eq!(limit.parameters["properties"]["limit_type"]["enum"][2], "Z");
        assert!(limit.parameters["required"].as_array().unwrap().is_empty());

        for tool in &tools {
            assert_eq!(tool.parameters["type"], "object");
            assert!(!tool.description.is_empty());
        }
    }
}
