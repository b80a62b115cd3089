/*!

This is the long-form manual for `civic_atlas` and the `civatlas` tools.

## Election results file

County-level presidential returns in the layout published by the MIT
Election Data and Science Lab (`countypres_2000-2024.tab`): one row per
candidate per county per year, tab-separated, with a header row in the
first line. Columns are located by name, so their order is free and extra
columns (`office`, `version`, `mode`, ...) are ignored.

The columns that must be present:

| column           | meaning                                     |
|------------------|---------------------------------------------|
| `year`           | election year                               |
| `state`          | state name, usually upper case              |
| `state_po`       | two-letter postal abbreviation              |
| `county_name`    | county name, usually upper case             |
| `county_fips`    | county FIPS code, 1 to 5 digits             |
| `candidate`      | candidate name                              |
| `party`          | party label                                 |
| `candidatevotes` | votes for this candidate in this county     |
| `totalvotes`     | all ballots cast in this county (repeated)  |

```text
year	state	state_po	county_name	county_fips	candidate	party	candidatevotes	totalvotes
2020	CALIFORNIA	CA	LOS ANGELES	6037	JOSEPH R BIDEN JR	DEMOCRAT	3028885	4263443
2020	CALIFORNIA	CA	LOS ANGELES	6037	DONALD J TRUMP	REPUBLICAN	1145530	4263443
```

Notes:
- county FIPS codes are zero-padded to 5 digits on ingest and the padded
  string is the key everywhere downstream.
- rows whose candidate or party is `OTHER` are dropped from the candidate
  lists but still count in the total, since `totalvotes` covers all ballots.
- malformed lines (too few columns, unreadable year) are skipped with a log
  message. A missing header column is the only parse-level error.

## Census data

Demographic data comes from the American Community Survey 5-year estimates
and is kept in two layers on disk: raw per-table extracts as returned by
the Census API, and one merged file per state that the server reads.

### ACS extracts

One file per table per state, named `acs-<table>-<state fips>.json` where
`<table>` is one of `population`, `race`, `education` or `income`. Each
file holds the Census API response verbatim: an array of string arrays
whose first element is the header row, with the geography columns
(`state`, `county`) at the end.

```text
[
  ["NAME","B01003_001E","B01002_001E","state","county"],
  ["Alameda County, California","1622188","38.1","06","001"]
]
```

The variables read from each table:
* `population`: B01003_001E (total population), B01002_001E (median age)
* `race`: B02001_001E through B02001_008E (total, White, Black, Native
  American, Asian, Pacific Islander, other race, two or more races) and
  B03002_012E (Hispanic or Latino)
* `education`: DP02_0059E through DP02_0066E (population 25 and over and
  attainment counts from less than 9th grade up to graduate degrees)
* `income`: DP03_0062E (median household income), DP03_0063E (mean)

Suppressed values come back as `null`, an empty string or a large negative
sentinel; all of these are read as zero.

### County demographics files

`civatlas --ingest-acs <dir>` merges the four extracts of every state
found in `<dir>` and writes one `county-demographics-<state fips>.json`
per state. Each file is a JSON array with one record per county:

```text
[
  {
    "countyFips": "001",
    "stateFips": "06",
    "name": "Alameda County, California",
    "population": 1622188,
    "medianAge": 38.1,
    "race": { "white": 31.1, "black": 10.1, "asian": 30.8, ... },
    "education": { "lessThanHighSchool": 9.0, "highSchool": 16.0, ... },
    "medianIncome": 122488,
    "meanIncome": 156842
  }
]
```

Race and education values are percentages rounded to one decimal. Counties
without a population row are dropped during the merge; a county missing
from the race or education tables keeps a zeroed block instead.

## Data directory

The server and the command line tool take `--data` (the election results
file) and `--census-dir` (the directory of county demographics files). A
typical layout:

```text
data/
    countypres_2000-2024.tab
    census/
        acs-population-06.json
        acs-race-06.json
        acs-education-06.json
        acs-income-06.json
        county-demographics-06.json
```

Both sources are optional at runtime. Without election data the tools fall
back to a small curated dataset; without a census file for a state, county
records keep their turnout-based estimates.

## Political lean

Leans are classified from the two-party vote share, pooled over the three
most recent election years present in the data:

* `strongly-democratic`: Democratic share above 60%
* `democratic`: Democratic share above 55%
* `strongly-republican`: Republican share above 60%
* `republican`: Republican share above 55%
* `swing`: shares within 5 points of each other, or no major-party votes
* otherwise the plain label of the larger share

Party labels are matched by substring, so fusion labels such as
`DEMOCRATIC-FARMER-LABOR` count toward the Democratic share.

 */
