/*!

This is the long-form manual for `likert_tally` and `tamsurvey`.

## The questionnaire

The survey measures the acceptance of a technology along five constructs of the
Technology Acceptance Model. Each construct (an *indicator group*) has four or five
statements, and the respondent rates every statement on a 5-point scale:

* `1` Sangat Tidak Setuju (strongly disagree)
* `2` Tidak Setuju
* `3` Netral
* `4` Setuju
* `5` Sangat Setuju (strongly agree)

No statement has a default answer: a sheet is only accepted when every statement has been
rated. The stored value for a group is the mean of its ratings, so it lies between 1 and 5.

## Collecting answers

```bash
tamsurvey submit
```

The questionnaire is printed group by group and each statement waits for a number between 1
and 5. An empty line skips the statement; the sheet will then be refused at the end and
nothing is written. The respondent name is optional. When it is left out, the name becomes
`Responden_` followed by the current local time (`YYYYMMDDhhmmss`).

Answers can also come from a JSON document:

```json
{
  "name": "Ani",
  "answers": {
    "Perceived Usefulness (PU)": [4, 5, 4, 3, 4],
    "Perceived Ease of Use (PEOU)": [5, 5, 4, 4, null]
  }
}
```

```bash
tamsurvey submit --answers answers.json
```

Groups that are not listed, and `null` entries, count as unanswered.

## The data file

Every accepted sheet adds one line to `data/hasil_responden.csv`: one column per indicator
group holding the mean, and a `Nama` column. The header is written with the first line. A
file written by an older questionnaire keeps its lines; when new indicator columns appear,
the file is rewritten once with the extra columns left blank for the older lines.

## Results

```bash
tamsurvey report --username admin --password 12345 \
    --chart scores.svg --export-csv hasil_responden.csv --export-xlsx hasil_responden.xlsx
```

The report prints the stored lines, the average of every indicator column that is present in
the file and a bar chart whose axis always spans 1 to 5. With wrong credentials, nothing is
read. With `--out` the averages are also written as JSON, and `--reference` compares them to
a previously saved summary.

## Configuration

`--config` reads a JSON document; every key is optional:

```json
{
  "title": "Kuesioner TAM",
  "dataFile": "data/hasil_responden.csv",
  "admin": { "username": "admin", "password": "12345" },
  "indicators": [
    { "name": "Perceived Usefulness (PU)", "questions": ["...", "..."] }
  ]
}
```

`--data` overrides the location of the data file.
*/
